//! 目录 API 路由。
//!
//! 学院、系、课程和教师。

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use feedback_api_types::{
    CatalogEntry, NewCourseRequest, NewDepartmentRequest, NewSchoolRequest, NewTeacherRequest,
    TeacherResponse,
};
use feedback_core::domain::{CourseId, DepartmentId, SchoolId};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{
    CourseRecord, DepartmentRecord, NewCourse, NewDepartment, NewSchool, NewTeacher, SchoolRecord,
    TeacherRecord,
};

pub fn create_catalog_router() -> Router<Arc<AppState>> {
    Router::new()
        // 注册和统计筛选用的级联下拉
        .route("/api/catalog/departments", get(departments_for_school))
        .route("/api/catalog/courses", get(courses_for_department))
        .route("/api/admin/schools", get(list_schools).post(create_school))
        .route("/api/admin/departments", post(create_department))
        .route("/api/admin/courses", post(create_course))
        .route("/api/admin/teachers", get(list_teachers).post(create_teacher))
}

#[derive(Debug, Deserialize)]
struct DepartmentQuery {
    school: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CourseQuery {
    department: Option<String>,
}

/// 列出学院下的系。缺失或无效的 id 返回空列表。
async fn departments_for_school(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DepartmentQuery>,
) -> Result<Json<Vec<CatalogEntry<DepartmentId>>>, ApiError> {
    let Some(school_id) = query.school.and_then(|raw| raw.parse::<SchoolId>().ok()) else {
        return Ok(Json(Vec::new()));
    };

    let departments = state.catalog.departments_for_school(school_id).await?;
    Ok(Json(departments.into_iter().map(department_entry).collect()))
}

/// 列出系下的课程。缺失或无效的 id 返回空列表。
async fn courses_for_department(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<CatalogEntry<CourseId>>>, ApiError> {
    let Some(department_id) = query
        .department
        .and_then(|raw| raw.parse::<DepartmentId>().ok())
    else {
        return Ok(Json(Vec::new()));
    };

    let courses = state.catalog.courses_for_department(department_id).await?;
    Ok(Json(courses.into_iter().map(course_entry).collect()))
}

async fn list_schools(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CatalogEntry<SchoolId>>>, ApiError> {
    let schools = state.catalog.list_schools().await?;
    Ok(Json(schools.into_iter().map(school_entry).collect()))
}

async fn create_school(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewSchoolRequest>,
) -> Result<(StatusCode, Json<CatalogEntry<SchoolId>>), ApiError> {
    let school = state
        .catalog
        .create_school(NewSchool {
            name: request.name,
            code: request.code,
            description: request.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(school_entry(school))))
}

async fn create_department(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewDepartmentRequest>,
) -> Result<(StatusCode, Json<CatalogEntry<DepartmentId>>), ApiError> {
    let department = state
        .catalog
        .create_department(NewDepartment {
            school_id: request.school_id,
            name: request.name,
            code: request.code,
            description: request.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(department_entry(department))))
}

async fn create_course(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<CatalogEntry<CourseId>>), ApiError> {
    let course = state
        .catalog
        .create_course(NewCourse {
            department_id: request.department_id,
            name: request.name,
            code: request.code,
            semester: request.semester,
            year: request.year,
            description: request.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(course_entry(course))))
}

async fn list_teachers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TeacherResponse>>, ApiError> {
    let teachers = state.teachers.list().await?;
    Ok(Json(teachers.into_iter().map(teacher_response).collect()))
}

async fn create_teacher(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherResponse>), ApiError> {
    let teacher = state
        .teachers
        .create(NewTeacher {
            name: request.name,
            email: request.email,
            employee_id: request.employee_id,
            department_id: request.department_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(teacher_response(teacher))))
}

fn school_entry(school: SchoolRecord) -> CatalogEntry<SchoolId> {
    CatalogEntry {
        id: school.id,
        name: school.name,
        code: school.code,
    }
}

fn department_entry(department: DepartmentRecord) -> CatalogEntry<DepartmentId> {
    CatalogEntry {
        id: department.id,
        name: department.name,
        code: department.code,
    }
}

fn course_entry(course: CourseRecord) -> CatalogEntry<CourseId> {
    CatalogEntry {
        id: course.id,
        name: course.name,
        code: course.code,
    }
}

fn teacher_response(teacher: TeacherRecord) -> TeacherResponse {
    TeacherResponse {
        label: teacher.label(),
        id: teacher.id,
        name: teacher.name,
        email: teacher.email,
        employee_id: teacher.employee_id,
        department_id: teacher.department_id,
    }
}
