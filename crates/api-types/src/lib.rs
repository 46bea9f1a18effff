//! Shared request/response types used by API-facing crates.

use chrono::NaiveDateTime;
use feedback_core::domain::{
    CourseId, DepartmentId, FormId, OptionId, QuestionId, QuestionKind, SchoolId, StudentId,
    SubmissionId, TeacherId, TemplateId, TemplateQuestionId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSiteResponse {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

// ---- catalog ----

/// One row of a cascading dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry<Id> {
    pub id: Id,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchoolRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartmentRequest {
    pub school_id: SchoolId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub department_id: DepartmentId,
    pub name: String,
    pub code: String,
    pub semester: i32,
    pub year: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeacherRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub department_id: DepartmentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherResponse {
    pub id: TeacherId,
    pub name: String,
    pub email: String,
    pub employee_id: Option<String>,
    pub department_id: DepartmentId,
    pub label: String,
}

// ---- accounts ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterStudentRequest {
    pub name: String,
    pub roll_number: String,
    pub school_id: SchoolId,
    pub department_id: DepartmentId,
    pub course_ids: Vec<CourseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: StudentId,
    pub roll_number: String,
    pub name: String,
    pub school_id: Option<SchoolId>,
    pub department_id: Option<DepartmentId>,
    pub course_ids: Vec<CourseId>,
}

// ---- templates and forms ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInput {
    pub option_text: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub question_text: String,
    pub question_type: QuestionKind,
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_required: bool,
    #[serde(default)]
    pub options: Vec<OptionInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTemplateQuestionRequest {
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub is_required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateQuestionResponse {
    pub id: TemplateQuestionId,
    pub template_id: TemplateId,
    pub question_text: String,
    pub question_type: QuestionKind,
    pub order: i32,
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub teacher_ids: Vec<TeacherId>,
    pub course_ids: Vec<CourseId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub created: usize,
    pub skipped: usize,
    pub form_ids: Vec<FormId>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFormRequest {
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkMasterResponse {
    pub form_id: FormId,
    pub title: String,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub course_name: String,
    pub teacher_name: String,
    pub is_active: bool,
    pub is_master: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub pending: Vec<FormSummary>,
    pub completed: Vec<FormSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub id: OptionId,
    pub option_text: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionKind,
    pub order: i32,
    pub is_required: bool,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDetail {
    pub form: FormSummary,
    pub questions: Vec<QuestionView>,
}

/// Raw answers keyed by question, as entered on the form. Choice questions
/// carry the selected option id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: HashMap<QuestionId, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub submission_id: SubmissionId,
    pub message: String,
}

// ---- analytics ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormHeader {
    pub id: FormId,
    pub title: String,
    pub course_code: String,
    pub course_name: String,
    pub teacher_name: String,
    pub department_name: String,
    pub school_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionResult {
    pub option_id: OptionId,
    pub option_text: String,
    pub order: i32,
    pub count: u64,
    pub percentage: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    pub respondent: String,
    pub text: String,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionData {
    Mcq { options: Vec<OptionResult> },
    Text { responses: Vec<TextResult> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub order: i32,
    pub question_text: String,
    pub total_responses: u64,
    pub data: QuestionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResultsResponse {
    pub form: FormHeader,
    pub total_submissions: u64,
    pub results: Vec<QuestionResult>,
}

fn default_true() -> bool {
    true
}
