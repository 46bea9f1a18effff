use crate::entity::{course, department, student, student_course};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use feedback_core::domain::{CourseId, DepartmentId, EnrollmentId, RollNumber, SchoolId, StudentId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use std::collections::HashSet;
use tracing::info;

use super::{now, parse_id};

const DUPLICATE_ROLL_NUMBER: &str = "This roll number is already registered.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: StudentId,
    pub roll_number: String,
    pub name: String,
    pub school_id: Option<SchoolId>,
    pub department_id: Option<DepartmentId>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub roll_number: RollNumber,
    pub school_id: SchoolId,
    pub department_id: DepartmentId,
    pub course_ids: Vec<CourseId>,
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Creates the student and enrolls them in every selected course, or
    /// writes nothing.
    async fn register(&self, new_student: NewStudent) -> AppResult<StudentRecord>;
    async fn find_by_id(&self, student_id: StudentId) -> AppResult<Option<StudentRecord>>;
    async fn enrolled_course_ids(&self, student_id: StudentId) -> AppResult<Vec<CourseId>>;
}

#[derive(Clone)]
pub struct SeaOrmStudentRepository {
    db: DatabaseConnection,
}

impl SeaOrmStudentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: student::Model) -> anyhow::Result<StudentRecord> {
        Ok(StudentRecord {
            id: parse_id(&model.id, "student.id")?,
            roll_number: model.roll_number,
            name: model.name,
            school_id: model
                .school_id
                .as_deref()
                .map(|raw| parse_id(raw, "student.school_id"))
                .transpose()?,
            department_id: model
                .department_id
                .as_deref()
                .map(|raw| parse_id(raw, "student.department_id"))
                .transpose()?,
            is_active: model.is_active,
        })
    }

    async fn check_placement(&self, new_student: &NewStudent) -> AppResult<()> {
        let department = department::Entity::find_by_id(new_student.department_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("department", new_student.department_id))?;

        if department.school_id != new_student.school_id.to_string() {
            return Err(AppError::validation(
                "Select a department that belongs to the selected school.",
            ));
        }

        let wanted: HashSet<String> = new_student
            .course_ids
            .iter()
            .map(ToString::to_string)
            .collect();
        let offered = course::Entity::find()
            .filter(course::Column::Id.is_in(wanted.iter().cloned()))
            .filter(course::Column::DepartmentId.eq(department.id))
            .all(&self.db)
            .await?;

        if offered.len() != wanted.len() {
            return Err(AppError::validation(
                "Select courses offered by the selected department.",
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn register(&self, new_student: NewStudent) -> AppResult<StudentRecord> {
        let name = new_student.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name must not be empty."));
        }
        if new_student.course_ids.is_empty() {
            return Err(AppError::validation("Select all courses you are enrolled in."));
        }

        let taken = student::Entity::find()
            .filter(student::Column::RollNumber.eq(new_student.roll_number.as_str()))
            .one(&self.db)
            .await?
            .is_some();
        if taken {
            return Err(AppError::validation(DUPLICATE_ROLL_NUMBER));
        }

        self.check_placement(&new_student).await?;

        let student_id = StudentId::new();
        let joined_at = now();
        let txn = self.db.begin().await?;

        let model = student::ActiveModel {
            id: Set(student_id.to_string()),
            roll_number: Set(new_student.roll_number.as_str().to_string()),
            name: Set(name),
            school_id: Set(Some(new_student.school_id.to_string())),
            department_id: Set(Some(new_student.department_id.to_string())),
            is_active: Set(true),
            is_staff: Set(false),
            joined_at: Set(joined_at),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_ROLL_NUMBER))?;

        let mut enrolled = HashSet::new();
        for course_id in &new_student.course_ids {
            if !enrolled.insert(*course_id) {
                continue;
            }

            student_course::ActiveModel {
                id: Set(EnrollmentId::new().to_string()),
                student_id: Set(student_id.to_string()),
                course_id: Set(course_id.to_string()),
                enrolled_at: Set(joined_at),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        info!(
            student_id = %student_id,
            roll_number = %new_student.roll_number.as_str(),
            courses = enrolled.len(),
            "student registered"
        );

        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, student_id: StudentId) -> AppResult<Option<StudentRecord>> {
        let model = student::Entity::find_by_id(student_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn enrolled_course_ids(&self, student_id: StudentId) -> AppResult<Vec<CourseId>> {
        let models = student_course::Entity::find()
            .filter(student_course::Column::StudentId.eq(student_id.to_string()))
            .order_by_asc(student_course::Column::EnrolledAt)
            .all(&self.db)
            .await?;

        Ok(models
            .iter()
            .map(|model| parse_id(&model.course_id, "student_course.course_id"))
            .collect::<anyhow::Result<_>>()?)
    }
}
