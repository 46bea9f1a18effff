//! Storage access. Each repository is a trait with a sea-orm backed
//! implementation holding the shared connection.

mod analytics_repository;
mod catalog_repository;
mod form_repository;
mod form_writer;
mod student_repository;
mod submission_repository;
mod teacher_repository;
mod template_repository;

pub use analytics_repository::{
    AnalyticsRepository, FormReport, FormReportHeader, QuestionReport, QuestionReportBody,
    Roster, RosterRow, SeaOrmAnalyticsRepository,
};
pub use catalog_repository::{
    CatalogRepository, CourseRecord, DepartmentRecord, NewCourse, NewDepartment, NewSchool,
    SchoolRecord, SeaOrmCatalogRepository,
};
pub use form_repository::{
    FormListing, FormRecord, FormRepository, NewForm, OptionRecord, QuestionRecord,
    SeaOrmFormRepository,
};
pub use student_repository::{NewStudent, SeaOrmStudentRepository, StudentRecord, StudentRepository};
pub use submission_repository::{SeaOrmSubmissionRepository, SubmissionRepository};
pub use teacher_repository::{NewTeacher, SeaOrmTeacherRepository, TeacherRecord, TeacherRepository};
pub use template_repository::{
    NewTemplate, SeaOrmTemplateRepository, TemplateQuestionRecord, TemplateQuestionUpdate,
    TemplateRepository, TemplateSummaryRecord,
};

use anyhow::anyhow;
use chrono::NaiveDateTime;
use std::str::FromStr;

pub(crate) fn parse_id<T>(raw: &str, column: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = uuid::Error>,
{
    T::from_str(raw).map_err(|e| anyhow!("invalid {column} '{raw}' from database: {e}"))
}

pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
