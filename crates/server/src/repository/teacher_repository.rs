use crate::entity::{department, teacher};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use feedback_core::domain::{DepartmentId, TeacherId, teacher_label};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder};

use super::{now, parse_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherRecord {
    pub id: TeacherId,
    pub name: String,
    pub email: String,
    pub employee_id: Option<String>,
    pub department_id: DepartmentId,
}

impl TeacherRecord {
    pub fn label(&self) -> String {
        teacher_label(&self.name, self.employee_id.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub employee_id: Option<String>,
    pub department_id: DepartmentId,
}

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn create(&self, new_teacher: NewTeacher) -> AppResult<TeacherRecord>;
    async fn find_by_id(&self, teacher_id: TeacherId) -> AppResult<Option<TeacherRecord>>;
    async fn list(&self) -> AppResult<Vec<TeacherRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmTeacherRepository {
    db: DatabaseConnection,
}

impl SeaOrmTeacherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: teacher::Model) -> anyhow::Result<TeacherRecord> {
        Ok(TeacherRecord {
            id: parse_id(&model.id, "teacher.id")?,
            name: model.name,
            email: model.email,
            employee_id: model.employee_id,
            department_id: parse_id(&model.department_id, "teacher.department_id")?,
        })
    }
}

#[async_trait]
impl TeacherRepository for SeaOrmTeacherRepository {
    async fn create(&self, new_teacher: NewTeacher) -> AppResult<TeacherRecord> {
        let name = new_teacher.name.trim().to_string();
        let email = new_teacher.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(AppError::validation("teacher name must not be empty"));
        }
        if !email.contains('@') {
            return Err(AppError::validation(format!("invalid email address: {email}")));
        }

        let department_exists = department::Entity::find_by_id(new_teacher.department_id.to_string())
            .one(&self.db)
            .await?
            .is_some();
        if !department_exists {
            return Err(AppError::not_found("department", new_teacher.department_id));
        }

        // A blank employee id means "none", so it cannot collide with another blank.
        let employee_id = new_teacher
            .employee_id
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());

        let active_model = teacher::ActiveModel {
            id: Set(TeacherId::new().to_string()),
            name: Set(name),
            email: Set(email),
            employee_id: Set(employee_id),
            department_id: Set(new_teacher.department_id.to_string()),
            created_at: Set(now()),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            AppError::from_write(e, "a teacher with this email or employee id already exists")
        })?;
        Ok(Self::map_model(model)?)
    }

    async fn find_by_id(&self, teacher_id: TeacherId) -> AppResult<Option<TeacherRecord>> {
        let model = teacher::Entity::find_by_id(teacher_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn list(&self) -> AppResult<Vec<TeacherRecord>> {
        let models = teacher::Entity::find()
            .order_by_asc(teacher::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }
}
