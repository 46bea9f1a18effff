use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use feedback_api_types::{RegisterStudentRequest, StudentResponse};
use feedback_core::domain::RollNumber;
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::error::AppError;
use crate::repository::NewStudent;

pub fn create_accounts_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/accounts/register", post(register))
}

/// 注册学生，同时登记学院、系和所选课程。
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    let roll_number = RollNumber::new(request.roll_number).map_err(AppError::from)?;

    let student = state
        .students
        .register(NewStudent {
            name: request.name,
            roll_number,
            school_id: request.school_id,
            department_id: request.department_id,
            course_ids: request.course_ids,
        })
        .await?;
    let course_ids = state.students.enrolled_course_ids(student.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(StudentResponse {
            id: student.id,
            roll_number: student.roll_number,
            name: student.name,
            school_id: student.school_id,
            department_id: student.department_id,
            course_ids,
        }),
    ))
}
