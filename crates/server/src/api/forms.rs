//! 学生表单 API 路由。
//!
//! 提供待填列表、填写视图和提交。

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use feedback_api_types::{
    DashboardResponse, FormDetail, FormSummary, OptionView, QuestionView, SubmitRequest,
    SubmitResponse,
};
use feedback_core::domain::{FormId, is_master_title};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::ResourceId;
use super::identity::CurrentStudent;
use super::state::AppState;
use crate::error::AppError;
use crate::repository::{FormListing, QuestionRecord};

pub fn create_forms_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/forms/dashboard", get(dashboard))
        .route("/api/forms/{id}", get(form_for_student))
        .route("/api/forms/{id}/submit", post(submit))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentStudent(student_id): CurrentStudent,
) -> Result<Json<DashboardResponse>, ApiError> {
    let partition = state.forms.dashboard(student_id).await?;

    Ok(Json(DashboardResponse {
        pending: partition.pending.into_iter().map(form_summary).collect(),
        completed: partition.completed.into_iter().map(form_summary).collect(),
    }))
}

/// 获取可填写的表单及其有序问题；已提交时返回冲突。
async fn form_for_student(
    State(state): State<Arc<AppState>>,
    CurrentStudent(student_id): CurrentStudent,
    ResourceId(form_id): ResourceId<FormId>,
) -> Result<Json<FormDetail>, ApiError> {
    let listing = state
        .forms
        .listing(form_id)
        .await?
        .filter(|form| form.is_active)
        .ok_or_else(|| AppError::not_found("form", form_id))?;

    if state.submissions.has_submitted(form_id, student_id).await? {
        return Err(AppError::AlreadySubmitted.into());
    }

    let questions = state.forms.questions(form_id).await?;

    Ok(Json(FormDetail {
        form: form_summary(listing),
        questions: questions.into_iter().map(question_view).collect(),
    }))
}

async fn submit(
    State(state): State<Arc<AppState>>,
    CurrentStudent(student_id): CurrentStudent,
    ResourceId(form_id): ResourceId<FormId>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let submission_id = state
        .submissions
        .submit(form_id, student_id, &request.answers)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission_id,
            message: "Thank you! Your feedback has been submitted successfully.".to_string(),
        }),
    ))
}

pub(super) fn form_summary(listing: FormListing) -> FormSummary {
    FormSummary {
        is_master: is_master_title(&listing.title),
        id: listing.id,
        title: listing.title,
        description: listing.description,
        course_code: listing.course_code,
        course_name: listing.course_name,
        teacher_name: listing.teacher_name,
        is_active: listing.is_active,
        created_at: listing.created_at,
    }
}

fn question_view(question: QuestionRecord) -> QuestionView {
    QuestionView {
        id: question.id,
        question_text: question.text,
        question_type: question.kind,
        order: question.order,
        is_required: question.is_required,
        options: question
            .options
            .into_iter()
            .map(|option| OptionView {
                id: option.id,
                option_text: option.text,
                order: option.order,
            })
            .collect(),
    }
}
