use crate::entity::{course, department, school};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use feedback_core::domain::{CourseId, DepartmentId, SchoolId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use super::{now, parse_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolRecord {
    pub id: SchoolId,
    pub name: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRecord {
    pub id: DepartmentId,
    pub school_id: SchoolId,
    pub name: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub id: CourseId,
    pub department_id: DepartmentId,
    pub name: String,
    pub code: String,
    pub semester: i32,
    pub year: i32,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewSchool {
    pub name: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub school_id: SchoolId,
    pub name: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub department_id: DepartmentId,
    pub name: String,
    pub code: String,
    pub semester: i32,
    pub year: i32,
    pub description: String,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_school(&self, new_school: NewSchool) -> AppResult<SchoolRecord>;
    async fn create_department(&self, new_department: NewDepartment) -> AppResult<DepartmentRecord>;
    async fn create_course(&self, new_course: NewCourse) -> AppResult<CourseRecord>;
    async fn list_schools(&self) -> AppResult<Vec<SchoolRecord>>;
    async fn find_school(&self, school_id: SchoolId) -> AppResult<Option<SchoolRecord>>;
    async fn find_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Option<DepartmentRecord>>;
    async fn find_course(&self, course_id: CourseId) -> AppResult<Option<CourseRecord>>;
    /// Departments of one school, by name.
    async fn departments_for_school(&self, school_id: SchoolId) -> AppResult<Vec<DepartmentRecord>>;
    /// Courses of one department, by name.
    async fn courses_for_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<CourseRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_school(model: school::Model) -> anyhow::Result<SchoolRecord> {
        Ok(SchoolRecord {
            id: parse_id(&model.id, "school.id")?,
            name: model.name,
            code: model.code,
            description: model.description,
        })
    }

    fn map_department(model: department::Model) -> anyhow::Result<DepartmentRecord> {
        Ok(DepartmentRecord {
            id: parse_id(&model.id, "department.id")?,
            school_id: parse_id(&model.school_id, "department.school_id")?,
            name: model.name,
            code: model.code,
            description: model.description,
        })
    }

    fn map_course(model: course::Model) -> anyhow::Result<CourseRecord> {
        Ok(CourseRecord {
            id: parse_id(&model.id, "course.id")?,
            department_id: parse_id(&model.department_id, "course.department_id")?,
            name: model.name,
            code: model.code,
            semester: model.semester,
            year: model.year,
            description: model.description,
        })
    }
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn create_school(&self, new_school: NewSchool) -> AppResult<SchoolRecord> {
        let id = SchoolId::new();
        let created_at = now();

        let active_model = school::ActiveModel {
            id: Set(id.to_string()),
            name: Set(required(&new_school.name, "school name")?),
            code: Set(required(&new_school.code, "school code")?),
            description: Set(new_school.description),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "a school with this code already exists"))?;
        Ok(Self::map_school(model)?)
    }

    async fn create_department(&self, new_department: NewDepartment) -> AppResult<DepartmentRecord> {
        if self.find_school(new_department.school_id).await?.is_none() {
            return Err(AppError::not_found("school", new_department.school_id));
        }

        let id = DepartmentId::new();
        let created_at = now();

        let active_model = department::ActiveModel {
            id: Set(id.to_string()),
            school_id: Set(new_department.school_id.to_string()),
            name: Set(required(&new_department.name, "department name")?),
            code: Set(required(&new_department.code, "department code")?),
            description: Set(new_department.description),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            AppError::from_write(e, "this school already has a department with this code")
        })?;
        Ok(Self::map_department(model)?)
    }

    async fn create_course(&self, new_course: NewCourse) -> AppResult<CourseRecord> {
        if self.find_department(new_course.department_id).await?.is_none() {
            return Err(AppError::not_found("department", new_course.department_id));
        }
        if new_course.semester < 1 {
            return Err(AppError::validation(format!(
                "invalid semester: {}",
                new_course.semester
            )));
        }

        let id = CourseId::new();
        let created_at = now();

        let active_model = course::ActiveModel {
            id: Set(id.to_string()),
            department_id: Set(new_course.department_id.to_string()),
            name: Set(required(&new_course.name, "course name")?),
            code: Set(required(&new_course.code, "course code")?),
            semester: Set(new_course.semester),
            year: Set(new_course.year),
            description: Set(new_course.description),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            AppError::from_write(
                e,
                "this course code already exists for the department in that term",
            )
        })?;
        Ok(Self::map_course(model)?)
    }

    async fn list_schools(&self) -> AppResult<Vec<SchoolRecord>> {
        let models = school::Entity::find()
            .order_by_asc(school::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_school)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn find_school(&self, school_id: SchoolId) -> AppResult<Option<SchoolRecord>> {
        let model = school::Entity::find_by_id(school_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_school).transpose()?)
    }

    async fn find_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Option<DepartmentRecord>> {
        let model = department::Entity::find_by_id(department_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_department).transpose()?)
    }

    async fn find_course(&self, course_id: CourseId) -> AppResult<Option<CourseRecord>> {
        let model = course::Entity::find_by_id(course_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_course).transpose()?)
    }

    async fn departments_for_school(&self, school_id: SchoolId) -> AppResult<Vec<DepartmentRecord>> {
        let models = department::Entity::find()
            .filter(department::Column::SchoolId.eq(school_id.to_string()))
            .order_by_asc(department::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_department)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn courses_for_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<CourseRecord>> {
        let models = course::Entity::find()
            .filter(course::Column::DepartmentId.eq(department_id.to_string()))
            .order_by_asc(course::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_course)
            .collect::<anyhow::Result<_>>()?)
    }
}
