//! 管理 API 路由。
//!
//! 提供站点标签、表单模板、模板分配以及直接创建表单的能力。

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use feedback_api_types::{
    AdminSiteResponse, AllocateRequest, AllocationResponse, FormSummary, MarkMasterResponse,
    NewFormRequest, NewTemplateRequest, QuestionInput, TemplateQuestionResponse, TemplateSummary,
    UpdateTemplateQuestionRequest,
};
use feedback_core::domain::{
    AllocationOutcome, AllocationTarget, FormId, OptionBlueprint, QuestionBlueprint, TemplateId,
    TemplateQuestionId, plan_targets,
};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::ResourceId;
use super::forms::form_summary;
use super::state::AppState;
use crate::error::AppError;
use crate::repository::{
    NewForm, NewTemplate, TemplateQuestionRecord, TemplateQuestionUpdate, TemplateSummaryRecord,
};

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/site", get(site))
        .route("/api/admin/templates", get(list_templates).post(create_template))
        .route("/api/admin/templates/{id}/questions", post(add_template_question))
        .route(
            "/api/admin/template-questions/{id}",
            patch(update_template_question),
        )
        .route("/api/admin/templates/{id}/allocate", post(allocate_template))
        .route("/api/admin/forms", post(create_form))
        .route("/api/admin/forms/{id}/master", post(mark_as_master))
        .route("/api/admin/forms/{id}/allocate", post(allocate_master))
}

async fn site(State(state): State<Arc<AppState>>) -> Json<AdminSiteResponse> {
    let labels = &state.admin_site;
    Json(AdminSiteResponse {
        site_header: labels.site_header.clone(),
        site_title: labels.site_title.clone(),
        index_title: labels.index_title.clone(),
    })
}

async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemplateSummary>>, ApiError> {
    let templates = state.templates.list().await?;
    Ok(Json(templates.into_iter().map(template_summary).collect()))
}

/// 创建模板及其问题和选项。
async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateSummary>), ApiError> {
    let template = state
        .templates
        .create(NewTemplate {
            name: request.name,
            description: request.description,
            is_active: request.is_active,
            questions: request.questions.into_iter().map(blueprint).collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(template_summary(template))))
}

async fn add_template_question(
    State(state): State<Arc<AppState>>,
    ResourceId(template_id): ResourceId<TemplateId>,
    Json(request): Json<QuestionInput>,
) -> Result<(StatusCode, Json<TemplateQuestionResponse>), ApiError> {
    let question = state
        .templates
        .add_question(template_id, blueprint(request))
        .await?;

    Ok((StatusCode::CREATED, Json(template_question(question))))
}

/// 编辑模板问题。已分配的表单保留各自的副本。
async fn update_template_question(
    State(state): State<Arc<AppState>>,
    ResourceId(question_id): ResourceId<TemplateQuestionId>,
    Json(request): Json<UpdateTemplateQuestionRequest>,
) -> Result<Json<TemplateQuestionResponse>, ApiError> {
    let question = state
        .templates
        .update_question(
            question_id,
            TemplateQuestionUpdate {
                text: request.question_text,
                is_required: request.is_required,
            },
        )
        .await?;

    Ok(Json(template_question(question)))
}

/// 为每个选中的教师与课程组合生成表单。
async fn allocate_template(
    State(state): State<Arc<AppState>>,
    ResourceId(template_id): ResourceId<TemplateId>,
    Json(request): Json<AllocateRequest>,
) -> Result<Json<AllocationResponse>, ApiError> {
    let targets = allocation_targets(&request)?;
    let outcome = state
        .templates
        .allocate(template_id, &targets, request.is_active)
        .await?;

    Ok(Json(allocation_response(outcome)))
}

async fn create_form(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewFormRequest>,
) -> Result<(StatusCode, Json<FormSummary>), ApiError> {
    let form = state
        .forms
        .create(NewForm {
            course_id: request.course_id,
            teacher_id: request.teacher_id,
            title: request.title,
            description: request.description,
            is_active: request.is_active,
            questions: request.questions.into_iter().map(blueprint).collect(),
        })
        .await?;
    let listing = state
        .forms
        .listing(form.id)
        .await?
        .ok_or_else(|| AppError::not_found("form", form.id))?;

    Ok((StatusCode::CREATED, Json(form_summary(listing))))
}

/// 将表单标记为主表单：标题加前缀并停用。
async fn mark_as_master(
    State(state): State<Arc<AppState>>,
    ResourceId(form_id): ResourceId<FormId>,
) -> Result<Json<MarkMasterResponse>, ApiError> {
    let (form, changed) = state.forms.mark_as_master(form_id).await?;

    Ok(Json(MarkMasterResponse {
        form_id: form.id,
        title: form.title,
        changed,
    }))
}

/// 将主表单复制给每个选中的教师与课程组合。
async fn allocate_master(
    State(state): State<Arc<AppState>>,
    ResourceId(form_id): ResourceId<FormId>,
    Json(request): Json<AllocateRequest>,
) -> Result<Json<AllocationResponse>, ApiError> {
    let targets = allocation_targets(&request)?;
    let outcome = state
        .forms
        .allocate_master(form_id, &targets, request.is_active)
        .await?;

    Ok(Json(allocation_response(outcome)))
}

fn allocation_targets(request: &AllocateRequest) -> Result<Vec<AllocationTarget>, ApiError> {
    if request.teacher_ids.is_empty() || request.course_ids.is_empty() {
        return Err(ApiError::bad_request(
            "Select at least one teacher and one course.",
        ));
    }
    Ok(plan_targets(&request.teacher_ids, &request.course_ids))
}

fn allocation_response(outcome: AllocationOutcome) -> AllocationResponse {
    let created = outcome.created_count();
    let message = if outcome.skipped == 0 {
        format!("Successfully created {created} form(s) from template!")
    } else {
        format!(
            "Successfully created {created} form(s) from template! Skipped {} existing allocation(s).",
            outcome.skipped
        )
    };

    AllocationResponse {
        created,
        skipped: outcome.skipped,
        form_ids: outcome.created,
        message,
    }
}

fn blueprint(input: QuestionInput) -> QuestionBlueprint {
    QuestionBlueprint {
        text: input.question_text,
        kind: input.question_type,
        order: input.order,
        is_required: input.is_required,
        options: input
            .options
            .into_iter()
            .map(|option| OptionBlueprint {
                text: option.option_text,
                order: option.order,
            })
            .collect(),
    }
}

fn template_summary(template: TemplateSummaryRecord) -> TemplateSummary {
    TemplateSummary {
        id: template.id,
        name: template.name,
        description: template.description,
        is_active: template.is_active,
        question_count: template.question_count,
    }
}

fn template_question(question: TemplateQuestionRecord) -> TemplateQuestionResponse {
    TemplateQuestionResponse {
        id: question.id,
        template_id: question.template_id,
        question_text: question.text,
        question_type: question.kind,
        order: question.order,
        is_required: question.is_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_core::domain::{CourseId, FormId, TeacherId};

    #[test]
    fn allocation_needs_teachers_and_courses() {
        let request = AllocateRequest {
            teacher_ids: vec![TeacherId::new()],
            course_ids: Vec::new(),
            is_active: true,
        };

        let err = allocation_targets(&request).expect_err("no courses");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn allocation_message_reports_skips() {
        let outcome = AllocationOutcome {
            created: vec![FormId::new(), FormId::new()],
            skipped: 1,
        };

        let response = allocation_response(outcome);

        assert_eq!(response.created, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(
            response.message,
            "Successfully created 2 form(s) from template! Skipped 1 existing allocation(s)."
        );
    }

    #[test]
    fn targets_are_the_cross_product() {
        let request = AllocateRequest {
            teacher_ids: vec![TeacherId::new(), TeacherId::new()],
            course_ids: vec![CourseId::new(), CourseId::new(), CourseId::new()],
            is_active: false,
        };

        let targets = allocation_targets(&request).expect("targets");

        assert_eq!(targets.len(), 6);
    }
}
