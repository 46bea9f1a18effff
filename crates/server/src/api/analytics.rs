//! 统计结果 API 路由。
//!
//! 提供结果浏览和电子表格下载。

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use feedback_api_types::{
    FormHeader, FormResultsResponse, FormSummary, OptionResult, QuestionData, QuestionResult,
    TextResult,
};
use feedback_core::domain::{CourseId, FormId, TextEntry};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use super::extract::ResourceId;
use super::forms::form_summary;
use super::state::AppState;
use crate::error::AppError;
use crate::export::{
    WorkbookLayout, XLSX_CONTENT_TYPE, form_report_filename, form_report_layout, render,
    roster_filename, roster_layout,
};
use crate::repository::{FormReport, QuestionReport, QuestionReportBody};

pub fn create_analytics_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analytics/forms", get(forms_for_course))
        .route("/api/analytics/forms/{id}/results", get(form_results))
        .route("/api/analytics/forms/{id}/export", get(export_form_results))
        .route("/api/analytics/students/export", get(export_students))
}

#[derive(Debug, Deserialize)]
struct CourseQuery {
    course: Option<String>,
}

/// 列出课程的表单，最新的在前。缺失或无效的 id 返回空列表。
async fn forms_for_course(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<FormSummary>>, ApiError> {
    let Some(course_id) = query.course.and_then(|raw| raw.parse::<CourseId>().ok()) else {
        return Ok(Json(Vec::new()));
    };

    let forms = state.forms.forms_for_course(course_id).await?;
    Ok(Json(forms.into_iter().map(form_summary).collect()))
}

async fn form_results(
    State(state): State<Arc<AppState>>,
    ResourceId(form_id): ResourceId<FormId>,
) -> Result<Json<FormResultsResponse>, ApiError> {
    let report = state.analytics.form_report(form_id).await?;
    Ok(Json(results_response(report)))
}

async fn export_form_results(
    State(state): State<Arc<AppState>>,
    ResourceId(form_id): ResourceId<FormId>,
) -> Result<Response, ApiError> {
    let report = state.analytics.form_report(form_id).await?;
    let generated_at = chrono::Local::now().naive_local();

    let filename = form_report_filename(&report.header, generated_at);
    let layout = form_report_layout(&report, generated_at);
    info!(form_id = %form_id, filename = %filename, "exporting form results");

    attachment(&layout, &filename)
}

async fn export_students(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let roster = state.analytics.roster().await?;
    let generated_at = chrono::Local::now().naive_local();

    let filename = roster_filename(generated_at);
    let layout = roster_layout(&roster, generated_at);
    info!(students = roster.students.len(), "exporting student roster");

    attachment(&layout, &filename)
}

fn attachment(layout: &WorkbookLayout, filename: &str) -> Result<Response, ApiError> {
    let bytes = render(layout)
        .context("failed to render workbook")
        .map_err(AppError::from)?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn results_response(report: FormReport) -> FormResultsResponse {
    let header = report.header;

    FormResultsResponse {
        form: FormHeader {
            id: header.form_id,
            title: header.title,
            course_code: header.course_code,
            course_name: header.course_name,
            teacher_name: header.teacher_name,
            department_name: header.department_name,
            school_name: header.school_name,
        },
        total_submissions: report.total_submissions,
        results: report.questions.into_iter().map(question_result).collect(),
    }
}

fn question_result(question: QuestionReport) -> QuestionResult {
    let total_responses = question.total_responses();

    let data = match question.body {
        QuestionReportBody::Mcq(tally) => QuestionData::Mcq {
            options: tally
                .options
                .iter()
                .map(|option| OptionResult {
                    option_id: option.option_id,
                    option_text: option.text.clone(),
                    order: option.order,
                    count: option.count,
                    percentage: tally.percentage_of(option.count),
                    label: tally.label_of(option.count),
                })
                .collect(),
        },
        QuestionReportBody::Text(entries) => QuestionData::Text {
            responses: TextEntry::newest_first(entries)
                .into_iter()
                .map(|entry| TextResult {
                    respondent: entry.respondent,
                    text: entry.text,
                    submitted_at: entry.submitted_at,
                })
                .collect(),
        },
    };

    QuestionResult {
        question_id: question.id,
        order: question.order,
        question_text: question.text,
        total_responses,
        data,
    }
}
