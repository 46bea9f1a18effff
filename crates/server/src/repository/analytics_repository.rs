use crate::entity::{
    course, department, feedback_form, form_submission, response, school, student, student_course,
    teacher,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use feedback_core::domain::{
    FormId, McqTally, OptionId, QuestionId, QuestionKind, TextEntry, tally_options,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use super::form_repository::{FormRepository, SeaOrmFormRepository};
use super::parse_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReportHeader {
    pub form_id: FormId,
    pub title: String,
    pub course_code: String,
    pub course_name: String,
    pub teacher_name: String,
    pub department_name: String,
    pub school_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionReportBody {
    Mcq(McqTally),
    /// Non-empty answers, oldest first.
    Text(Vec<TextEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReport {
    pub id: QuestionId,
    pub order: i32,
    pub text: String,
    pub body: QuestionReportBody,
}

impl QuestionReport {
    pub fn total_responses(&self) -> u64 {
        match &self.body {
            QuestionReportBody::Mcq(tally) => tally.total,
            QuestionReportBody::Text(entries) => entries.len() as u64,
        }
    }

    /// Display label, `"Q{order}: {text}"`.
    pub fn label(&self) -> String {
        format!("Q{}: {}", self.order, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport {
    pub header: FormReportHeader,
    pub total_submissions: u64,
    pub questions: Vec<QuestionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub roll_number: String,
    pub name: String,
    pub school_name: Option<String>,
    pub department_name: Option<String>,
    pub course_codes: Vec<String>,
    pub joined_at: NaiveDateTime,
}

/// Registered students plus per-school and per-department head counts.
/// Every school and department appears in the counts, including empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub students: Vec<RosterRow>,
    pub school_counts: Vec<(String, u64)>,
    /// `(department name, school name, students)`.
    pub department_counts: Vec<(String, String, u64)>,
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn form_report(&self, form_id: FormId) -> AppResult<FormReport>;
    /// Non-staff students ordered by school, department and name.
    async fn roster(&self) -> AppResult<Roster>;
}

#[derive(Clone)]
pub struct SeaOrmAnalyticsRepository {
    db: DatabaseConnection,
    forms: SeaOrmFormRepository,
}

impl SeaOrmAnalyticsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            forms: SeaOrmFormRepository::new(db.clone()),
            db,
        }
    }

    async fn header(&self, form: &feedback_form::Model) -> AppResult<FormReportHeader> {
        let course = course::Entity::find_by_id(form.course_id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("course", &form.course_id))?;
        let teacher = teacher::Entity::find_by_id(form.teacher_id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("teacher", &form.teacher_id))?;
        let department = department::Entity::find_by_id(course.department_id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("department", &course.department_id))?;
        let school = school::Entity::find_by_id(department.school_id.as_str())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("school", &department.school_id))?;

        Ok(FormReportHeader {
            form_id: parse_id(&form.id, "feedback_form.id")?,
            title: form.title.clone(),
            course_code: course.code,
            course_name: course.name,
            teacher_name: teacher.name,
            department_name: department.name,
            school_name: school.name,
        })
    }
}

#[async_trait]
impl AnalyticsRepository for SeaOrmAnalyticsRepository {
    async fn form_report(&self, form_id: FormId) -> AppResult<FormReport> {
        let form = feedback_form::Entity::find_by_id(form_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("form", form_id))?;
        let header = self.header(&form).await?;
        let questions = self.forms.questions(form_id).await?;

        let submissions = form_submission::Entity::find()
            .filter(form_submission::Column::FormId.eq(form.id.as_str()))
            .all(&self.db)
            .await?;
        let total_submissions = submissions.len() as u64;

        let students: HashMap<String, String> = student::Entity::find()
            .filter(student::Column::Id.is_in(submissions.iter().map(|s| s.student_id.clone())))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let submitted_by: HashMap<String, (String, NaiveDateTime)> = submissions
            .into_iter()
            .map(|s| {
                let name = students.get(&s.student_id).cloned().unwrap_or_default();
                (s.id, (name, s.submitted_at))
            })
            .collect();

        let responses = response::Entity::find()
            .filter(response::Column::SubmissionId.is_in(submitted_by.keys().cloned()))
            .all(&self.db)
            .await?;
        let mut by_question: HashMap<String, Vec<response::Model>> = HashMap::new();
        for row in responses {
            by_question.entry(row.question_id.clone()).or_default().push(row);
        }

        let mut reports = Vec::with_capacity(questions.len());
        for question in questions {
            let rows = by_question
                .remove(&question.id.to_string())
                .unwrap_or_default();

            let body = match question.kind {
                QuestionKind::Mcq => {
                    let answers = rows
                        .iter()
                        .filter_map(|row| row.mcq_option_id.as_deref())
                        .map(|raw| parse_id::<OptionId>(raw, "response.mcq_option_id"))
                        .collect::<anyhow::Result<Vec<_>>>()?;
                    let options = question
                        .options
                        .iter()
                        .map(|option| (option.id, option.text.clone(), option.order));

                    QuestionReportBody::Mcq(tally_options(options, answers))
                }
                QuestionKind::Text => {
                    let entries = rows.into_iter().filter_map(|row| {
                        let (respondent, submitted_at) = submitted_by.get(&row.submission_id)?;
                        Some(TextEntry {
                            respondent: respondent.clone(),
                            text: row.text_answer,
                            submitted_at: *submitted_at,
                        })
                    });

                    QuestionReportBody::Text(TextEntry::chronological(entries))
                }
            };

            reports.push(QuestionReport {
                id: question.id,
                order: question.order,
                text: question.text,
                body,
            });
        }

        Ok(FormReport {
            header,
            total_submissions,
            questions: reports,
        })
    }

    async fn roster(&self) -> AppResult<Roster> {
        let schools = school::Entity::find()
            .order_by_asc(school::Column::Name)
            .all(&self.db)
            .await?;
        let departments = department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(&self.db)
            .await?;
        let students = student::Entity::find()
            .filter(student::Column::IsStaff.eq(false))
            .all(&self.db)
            .await?;

        let course_codes: HashMap<String, String> = course::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.code))
            .collect();
        let mut enrollments: HashMap<String, Vec<String>> = HashMap::new();
        for enrollment in student_course::Entity::find()
            .order_by_asc(student_course::Column::EnrolledAt)
            .all(&self.db)
            .await?
        {
            if let Some(code) = course_codes.get(&enrollment.course_id) {
                enrollments
                    .entry(enrollment.student_id)
                    .or_default()
                    .push(code.clone());
            }
        }

        let school_names: HashMap<&str, &str> = schools
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect();
        let department_names: HashMap<&str, &str> = departments
            .iter()
            .map(|d| (d.id.as_str(), d.name.as_str()))
            .collect();

        let school_counts = schools
            .iter()
            .map(|s| {
                let count = students
                    .iter()
                    .filter(|st| st.school_id.as_deref() == Some(s.id.as_str()))
                    .count() as u64;
                (s.name.clone(), count)
            })
            .collect();
        let department_counts = departments
            .iter()
            .map(|d| {
                let count = students
                    .iter()
                    .filter(|st| st.department_id.as_deref() == Some(d.id.as_str()))
                    .count() as u64;
                let school_name = school_names
                    .get(d.school_id.as_str())
                    .copied()
                    .unwrap_or_default();
                (d.name.clone(), school_name.to_string(), count)
            })
            .collect();

        let mut rows: Vec<RosterRow> = students
            .iter()
            .map(|st| RosterRow {
                roll_number: st.roll_number.clone(),
                name: st.name.clone(),
                school_name: st
                    .school_id
                    .as_deref()
                    .and_then(|id| school_names.get(id))
                    .map(|name| name.to_string()),
                department_name: st
                    .department_id
                    .as_deref()
                    .and_then(|id| department_names.get(id))
                    .map(|name| name.to_string()),
                course_codes: enrollments.remove(&st.id).unwrap_or_default(),
                joined_at: st.joined_at,
            })
            .collect();
        // Students without a school or department sort last.
        rows.sort_by(|a, b| {
            (a.school_name.is_none(), &a.school_name)
                .cmp(&(b.school_name.is_none(), &b.school_name))
                .then_with(|| {
                    (a.department_name.is_none(), &a.department_name)
                        .cmp(&(b.department_name.is_none(), &b.department_name))
                })
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(Roster {
            students: rows,
            school_counts,
            department_counts,
        })
    }
}
