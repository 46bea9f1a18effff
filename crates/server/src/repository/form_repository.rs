use crate::entity::{
    course, feedback_form, form_submission, mcq_option, question, student_course, teacher,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use feedback_core::domain::{
    AllocationOutcome, AllocationPlan, AllocationTarget, CourseId, FormId, FormPartition,
    OptionBlueprint, OptionId, QuestionBlueprint, QuestionId, QuestionKind, QuestionSpec,
    StudentId, TeacherId, is_master_title, mark_master_title, master_base_title,
    master_copy_title, partition_forms,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use tracing::info;

use super::form_writer::{FormDraft, TargetDirectory, insert_form};
use super::{now, parse_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub id: FormId,
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl FormRecord {
    pub fn is_master(&self) -> bool {
        is_master_title(&self.title)
    }
}

/// A form joined with the course and teacher names shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormListing {
    pub id: FormId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub course_code: String,
    pub course_name: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecord {
    pub id: OptionId,
    pub text: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub order: i32,
    pub text: String,
    pub kind: QuestionKind,
    pub is_required: bool,
    pub options: Vec<OptionRecord>,
}

impl QuestionRecord {
    pub fn to_spec(&self) -> QuestionSpec {
        QuestionSpec {
            id: self.id,
            order: self.order,
            kind: self.kind,
            is_required: self.is_required,
            option_ids: self.options.iter().map(|option| option.id).collect(),
        }
    }

    pub fn to_blueprint(&self) -> QuestionBlueprint {
        QuestionBlueprint {
            text: self.text.clone(),
            kind: self.kind,
            order: self.order,
            is_required: self.is_required,
            options: self
                .options
                .iter()
                .map(|option| OptionBlueprint {
                    text: option.text.clone(),
                    order: option.order,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewForm {
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub questions: Vec<QuestionBlueprint>,
}

#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create(&self, new_form: NewForm) -> AppResult<FormRecord>;
    async fn find_by_id(&self, form_id: FormId) -> AppResult<Option<FormRecord>>;
    async fn listing(&self, form_id: FormId) -> AppResult<Option<FormListing>>;
    /// Questions of a form in display order, each with its options in order.
    async fn questions(&self, form_id: FormId) -> AppResult<Vec<QuestionRecord>>;
    /// Forms of one course, newest first.
    async fn forms_for_course(&self, course_id: CourseId) -> AppResult<Vec<FormListing>>;
    /// Active forms in the student's enrolled courses, newest first, split by
    /// whether the student already submitted them.
    async fn dashboard(&self, student_id: StudentId) -> AppResult<FormPartition<FormListing>>;
    /// Returns the form after marking and whether anything changed.
    async fn mark_as_master(&self, form_id: FormId) -> AppResult<(FormRecord, bool)>;
    async fn allocate_master(
        &self,
        form_id: FormId,
        targets: &[AllocationTarget],
        is_active: bool,
    ) -> AppResult<AllocationOutcome>;
}

#[derive(Clone)]
pub struct SeaOrmFormRepository {
    db: DatabaseConnection,
}

impl SeaOrmFormRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: feedback_form::Model) -> anyhow::Result<FormRecord> {
        Ok(FormRecord {
            id: parse_id(&model.id, "feedback_form.id")?,
            course_id: parse_id(&model.course_id, "feedback_form.course_id")?,
            teacher_id: parse_id(&model.teacher_id, "feedback_form.teacher_id")?,
            title: model.title,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }

    async fn listings(&self, models: Vec<feedback_form::Model>) -> AppResult<Vec<FormListing>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: HashSet<String> = models.iter().map(|m| m.course_id.clone()).collect();
        let teacher_ids: HashSet<String> = models.iter().map(|m| m.teacher_id.clone()).collect();

        let courses: HashMap<String, course::Model> = course::Entity::find()
            .filter(course::Column::Id.is_in(course_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let teachers: HashMap<String, teacher::Model> = teacher::Entity::find()
            .filter(teacher::Column::Id.is_in(teacher_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        models
            .into_iter()
            .map(|model| -> AppResult<FormListing> {
                let course = courses
                    .get(&model.course_id)
                    .ok_or_else(|| AppError::not_found("course", &model.course_id))?;
                let teacher = teachers
                    .get(&model.teacher_id)
                    .ok_or_else(|| AppError::not_found("teacher", &model.teacher_id))?;

                Ok(FormListing {
                    id: parse_id(&model.id, "feedback_form.id")?,
                    title: model.title,
                    description: model.description,
                    is_active: model.is_active,
                    created_at: model.created_at,
                    course_code: course.code.clone(),
                    course_name: course.name.clone(),
                    teacher_name: teacher.name.clone(),
                })
            })
            .collect()
    }

    async fn copy_master_to(
        &self,
        base_title: &str,
        plan: &AllocationPlan,
        description: &str,
        directory: &TargetDirectory,
        target: AllocationTarget,
        is_active: bool,
    ) -> AppResult<Option<FormId>> {
        let needle = base_title.to_lowercase();
        let already_copied = feedback_form::Entity::find()
            .filter(feedback_form::Column::TeacherId.eq(target.teacher_id.to_string()))
            .filter(feedback_form::Column::CourseId.eq(target.course_id.to_string()))
            .all(&self.db)
            .await?
            .iter()
            .any(|form| form.title.to_lowercase().contains(&needle));
        if already_copied {
            return Ok(None);
        }

        let (teacher_name, course_code) = directory.names(&target)?;

        let txn = self.db.begin().await?;
        let form_id = insert_form(
            &txn,
            FormDraft {
                course_id: target.course_id,
                teacher_id: target.teacher_id,
                title: master_copy_title(course_code, teacher_name, base_title),
                description: description.to_string(),
                is_active,
                questions: plan.questions(),
            },
        )
        .await?;
        txn.commit().await?;

        Ok(Some(form_id))
    }
}

#[async_trait]
impl FormRepository for SeaOrmFormRepository {
    async fn create(&self, new_form: NewForm) -> AppResult<FormRecord> {
        let title = new_form.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("form title must not be empty"));
        }
        for question in &new_form.questions {
            question.validate()?;
        }

        let course_exists = course::Entity::find_by_id(new_form.course_id.to_string())
            .one(&self.db)
            .await?
            .is_some();
        if !course_exists {
            return Err(AppError::not_found("course", new_form.course_id));
        }
        let teacher_exists = teacher::Entity::find_by_id(new_form.teacher_id.to_string())
            .one(&self.db)
            .await?
            .is_some();
        if !teacher_exists {
            return Err(AppError::not_found("teacher", new_form.teacher_id));
        }

        let txn = self.db.begin().await?;
        let form_id = insert_form(
            &txn,
            FormDraft {
                course_id: new_form.course_id,
                teacher_id: new_form.teacher_id,
                title,
                description: new_form.description,
                is_active: new_form.is_active,
                questions: &new_form.questions,
            },
        )
        .await?;
        txn.commit().await?;

        info!(form_id = %form_id, questions = new_form.questions.len(), "form created");

        self.find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::not_found("form", form_id))
    }

    async fn find_by_id(&self, form_id: FormId) -> AppResult<Option<FormRecord>> {
        let model = feedback_form::Entity::find_by_id(form_id.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model).transpose()?)
    }

    async fn listing(&self, form_id: FormId) -> AppResult<Option<FormListing>> {
        let Some(model) = feedback_form::Entity::find_by_id(form_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.listings(vec![model]).await?.pop())
    }

    async fn questions(&self, form_id: FormId) -> AppResult<Vec<QuestionRecord>> {
        let questions = question::Entity::find()
            .filter(question::Column::FormId.eq(form_id.to_string()))
            .order_by_asc(question::Column::DisplayOrder)
            .all(&self.db)
            .await?;

        let options = mcq_option::Entity::find()
            .filter(mcq_option::Column::QuestionId.is_in(questions.iter().map(|q| q.id.clone())))
            .order_by_asc(mcq_option::Column::DisplayOrder)
            .all(&self.db)
            .await?;

        let mut options_by_question: HashMap<String, Vec<OptionRecord>> = HashMap::new();
        for option in options {
            let record = OptionRecord {
                id: parse_id(&option.id, "mcq_option.id")?,
                text: option.option_text,
                order: option.display_order,
            };
            options_by_question
                .entry(option.question_id)
                .or_default()
                .push(record);
        }

        questions
            .into_iter()
            .map(|model| -> AppResult<QuestionRecord> {
                Ok(QuestionRecord {
                    id: parse_id(&model.id, "question.id")?,
                    kind: model.question_type.parse()?,
                    options: options_by_question.remove(&model.id).unwrap_or_default(),
                    order: model.display_order,
                    text: model.question_text,
                    is_required: model.is_required,
                })
            })
            .collect()
    }

    async fn forms_for_course(&self, course_id: CourseId) -> AppResult<Vec<FormListing>> {
        let models = feedback_form::Entity::find()
            .filter(feedback_form::Column::CourseId.eq(course_id.to_string()))
            .order_by_desc(feedback_form::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.listings(models).await
    }

    async fn dashboard(&self, student_id: StudentId) -> AppResult<FormPartition<FormListing>> {
        let enrolled: Vec<String> = student_course::Entity::find()
            .filter(student_course::Column::StudentId.eq(student_id.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|enrollment| enrollment.course_id)
            .collect();
        if enrolled.is_empty() {
            return Ok(FormPartition::default());
        }

        let models = feedback_form::Entity::find()
            .filter(feedback_form::Column::CourseId.is_in(enrolled))
            .filter(feedback_form::Column::IsActive.eq(true))
            .order_by_desc(feedback_form::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let visible = self.listings(models).await?;

        let submitted: HashSet<FormId> = form_submission::Entity::find()
            .filter(form_submission::Column::StudentId.eq(student_id.to_string()))
            .all(&self.db)
            .await?
            .iter()
            .map(|submission| parse_id(&submission.form_id, "form_submission.form_id"))
            .collect::<anyhow::Result<_>>()?;

        Ok(partition_forms(visible, &submitted, |form| form.id))
    }

    async fn mark_as_master(&self, form_id: FormId) -> AppResult<(FormRecord, bool)> {
        let model = feedback_form::Entity::find_by_id(form_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("form", form_id))?;

        let Some(title) = mark_master_title(&model.title) else {
            return Ok((Self::map_model(model)?, false));
        };

        let mut active_model: feedback_form::ActiveModel = model.into();
        active_model.title = Set(title);
        active_model.is_active = Set(false);
        active_model.updated_at = Set(now());
        let updated = active_model.update(&self.db).await?;

        info!(form_id = %form_id, "form marked as master");
        Ok((Self::map_model(updated)?, true))
    }

    async fn allocate_master(
        &self,
        form_id: FormId,
        targets: &[AllocationTarget],
        is_active: bool,
    ) -> AppResult<AllocationOutcome> {
        let master = feedback_form::Entity::find_by_id(form_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("form", form_id))?;

        let blueprints = self
            .questions(form_id)
            .await?
            .iter()
            .map(QuestionRecord::to_blueprint)
            .collect();
        let plan = AllocationPlan::new(blueprints)?;
        let base_title = master_base_title(&master.title);
        let directory = TargetDirectory::resolve(&self.db, targets).await?;

        let mut outcome = AllocationOutcome::default();
        for target in targets {
            match self
                .copy_master_to(
                    &base_title,
                    &plan,
                    &master.description,
                    &directory,
                    *target,
                    is_active,
                )
                .await?
            {
                Some(copy_id) => outcome.created.push(copy_id),
                None => outcome.skipped += 1,
            }
        }

        info!(
            form_id = %form_id,
            created = outcome.created_count(),
            skipped = outcome.skipped,
            "master form allocation finished"
        );

        Ok(outcome)
    }
}
