use axum::{extract::FromRequestParts, http::request::Parts};
use feedback_core::domain::StudentId;
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;

pub const STUDENT_HEADER: &str = "x-student-id";

/// 当前学生，取自 `x-student-id` 请求头。
///
/// 请求头缺失、格式错误，或学生不存在、已停用时返回 401。
#[derive(Debug, Clone, Copy)]
pub struct CurrentStudent(pub StudentId);

impl FromRequestParts<Arc<AppState>> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let student_id = parts
            .headers
            .get(STUDENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.trim().parse::<StudentId>().ok())
            .ok_or_else(ApiError::unauthorized)?;

        let student = state.students.find_by_id(student_id).await?;
        match student {
            Some(student) if student.is_active => Ok(CurrentStudent(student.id)),
            _ => Err(ApiError::unauthorized()),
        }
    }
}
