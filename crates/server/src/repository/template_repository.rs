use crate::entity::{form_allocation, form_template, template_option, template_question};
use crate::error::{AppError, AppResult, is_unique_violation};
use async_trait::async_trait;
use feedback_core::domain::{
    AllocationId, AllocationOutcome, AllocationPlan, AllocationTarget, FormId, OptionBlueprint,
    QuestionBlueprint, QuestionKind, TemplateId, TemplateOptionId, TemplateQuestionId,
    allocated_form_title,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{info, warn};

use super::form_writer::{FormDraft, TargetDirectory, insert_form};
use super::{now, parse_id};

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub questions: Vec<QuestionBlueprint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummaryRecord {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateQuestionRecord {
    pub id: TemplateQuestionId,
    pub template_id: TemplateId,
    pub text: String,
    pub kind: QuestionKind,
    pub order: i32,
    pub is_required: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateQuestionUpdate {
    pub text: Option<String>,
    pub is_required: Option<bool>,
}

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, new_template: NewTemplate) -> AppResult<TemplateSummaryRecord>;
    async fn list(&self) -> AppResult<Vec<TemplateSummaryRecord>>;
    async fn add_question(
        &self,
        template_id: TemplateId,
        question: QuestionBlueprint,
    ) -> AppResult<TemplateQuestionRecord>;
    async fn update_question(
        &self,
        question_id: TemplateQuestionId,
        update: TemplateQuestionUpdate,
    ) -> AppResult<TemplateQuestionRecord>;
    /// Instantiates the template once per target. Targets that already hold
    /// an allocation of this template are skipped.
    async fn allocate(
        &self,
        template_id: TemplateId,
        targets: &[AllocationTarget],
        is_active: bool,
    ) -> AppResult<AllocationOutcome>;
}

#[derive(Clone)]
pub struct SeaOrmTemplateRepository {
    db: DatabaseConnection,
}

impl SeaOrmTemplateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_question(model: template_question::Model) -> AppResult<TemplateQuestionRecord> {
        Ok(TemplateQuestionRecord {
            id: parse_id(&model.id, "template_question.id")?,
            template_id: parse_id(&model.template_id, "template_question.template_id")?,
            kind: model.question_type.parse()?,
            text: model.question_text,
            order: model.display_order,
            is_required: model.is_required,
        })
    }

    async fn summary(&self, model: form_template::Model) -> AppResult<TemplateSummaryRecord> {
        let question_count = template_question::Entity::find()
            .filter(template_question::Column::TemplateId.eq(model.id.as_str()))
            .count(&self.db)
            .await?;

        Ok(TemplateSummaryRecord {
            id: parse_id(&model.id, "form_template.id")?,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            question_count: usize::try_from(question_count).map_err(anyhow::Error::from)?,
        })
    }

    /// Reads the template's questions and options into owned blueprints.
    async fn snapshot(&self, template_id: &str) -> AppResult<Vec<QuestionBlueprint>> {
        let questions = template_question::Entity::find()
            .filter(template_question::Column::TemplateId.eq(template_id))
            .order_by_asc(template_question::Column::DisplayOrder)
            .all(&self.db)
            .await?;

        let options = template_option::Entity::find()
            .filter(template_option::Column::QuestionId.is_in(questions.iter().map(|q| q.id.clone())))
            .order_by_asc(template_option::Column::DisplayOrder)
            .all(&self.db)
            .await?;

        let mut options_by_question: HashMap<String, Vec<OptionBlueprint>> = HashMap::new();
        for option in options {
            options_by_question
                .entry(option.question_id)
                .or_default()
                .push(OptionBlueprint {
                    text: option.option_text,
                    order: option.display_order,
                });
        }

        questions
            .into_iter()
            .map(|question| -> AppResult<QuestionBlueprint> {
                Ok(QuestionBlueprint {
                    kind: question.question_type.parse()?,
                    options: options_by_question.remove(&question.id).unwrap_or_default(),
                    text: question.question_text,
                    order: question.display_order,
                    is_required: question.is_required,
                })
            })
            .collect()
    }

    async fn insert_question<C>(
        conn: &C,
        template_id: &str,
        question: &QuestionBlueprint,
    ) -> AppResult<template_question::Model>
    where
        C: sea_orm::ConnectionTrait,
    {
        check_question(question)?;

        let model = template_question::ActiveModel {
            id: Set(TemplateQuestionId::new().to_string()),
            template_id: Set(template_id.to_string()),
            question_text: Set(question.text.trim().to_string()),
            question_type: Set(question.kind.as_tag().to_string()),
            display_order: Set(question.order),
            is_required: Set(question.is_required),
        }
        .insert(conn)
        .await?;

        if question.kind == QuestionKind::Mcq {
            for option in &question.options {
                template_option::ActiveModel {
                    id: Set(TemplateOptionId::new().to_string()),
                    question_id: Set(model.id.clone()),
                    option_text: Set(option.text.clone()),
                    display_order: Set(option.order),
                }
                .insert(conn)
                .await?;
            }
        }

        Ok(model)
    }

    /// One target, one transaction: the allocation row, the form and all of
    /// its questions land together or not at all.
    async fn allocate_one(
        &self,
        template: &form_template::Model,
        plan: &AllocationPlan,
        directory: &TargetDirectory,
        target: AllocationTarget,
        is_active: bool,
    ) -> AppResult<Option<FormId>> {
        let existing = form_allocation::Entity::find()
            .filter(form_allocation::Column::TemplateId.eq(template.id.as_str()))
            .filter(form_allocation::Column::TeacherId.eq(target.teacher_id.to_string()))
            .filter(form_allocation::Column::CourseId.eq(target.course_id.to_string()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(None);
        }

        let (teacher_name, course_code) = directory.names(&target)?;

        let txn = self.db.begin().await?;

        let form_id = insert_form(
            &txn,
            FormDraft {
                course_id: target.course_id,
                teacher_id: target.teacher_id,
                title: allocated_form_title(&template.name, teacher_name, course_code),
                description: template.description.clone(),
                is_active,
                questions: plan.questions(),
            },
        )
        .await?;

        let inserted = form_allocation::ActiveModel {
            id: Set(AllocationId::new().to_string()),
            template_id: Set(template.id.clone()),
            teacher_id: Set(target.teacher_id.to_string()),
            course_id: Set(target.course_id.to_string()),
            is_active: Set(is_active),
            allocated_at: Set(now()),
            feedback_form_id: Set(Some(form_id.to_string())),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(_) => {
                txn.commit().await?;
                Ok(Some(form_id))
            }
            // Another allocator won the race for this triple.
            Err(err) if is_unique_violation(&err) => {
                txn.rollback().await?;
                warn!(
                    template_id = %template.id,
                    teacher_id = %target.teacher_id,
                    course_id = %target.course_id,
                    "allocation already exists, rolled back"
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn check_question(question: &QuestionBlueprint) -> AppResult<()> {
    if question.text.trim().is_empty() {
        return Err(AppError::validation("question text must not be empty"));
    }
    question.validate()?;
    Ok(())
}

#[async_trait]
impl TemplateRepository for SeaOrmTemplateRepository {
    async fn create(&self, new_template: NewTemplate) -> AppResult<TemplateSummaryRecord> {
        let name = new_template.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("template name must not be empty"));
        }
        for question in &new_template.questions {
            check_question(question)?;
        }

        let template_id = TemplateId::new();
        let created_at = now();
        let txn = self.db.begin().await?;

        let model = form_template::ActiveModel {
            id: Set(template_id.to_string()),
            name: Set(name),
            description: Set(new_template.description),
            is_active: Set(new_template.is_active),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::from_write(e, "a template with this name already exists"))?;

        for question in &new_template.questions {
            Self::insert_question(&txn, &model.id, question).await?;
        }

        txn.commit().await?;
        info!(
            template_id = %template_id,
            questions = new_template.questions.len(),
            "template created"
        );

        self.summary(model).await
    }

    async fn list(&self) -> AppResult<Vec<TemplateSummaryRecord>> {
        let models = form_template::Entity::find()
            .order_by_asc(form_template::Column::Name)
            .all(&self.db)
            .await?;

        let mut summaries = Vec::with_capacity(models.len());
        for model in models {
            summaries.push(self.summary(model).await?);
        }
        Ok(summaries)
    }

    async fn add_question(
        &self,
        template_id: TemplateId,
        question: QuestionBlueprint,
    ) -> AppResult<TemplateQuestionRecord> {
        let template = form_template::Entity::find_by_id(template_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("template", template_id))?;

        let txn = self.db.begin().await?;
        let model = Self::insert_question(&txn, &template.id, &question).await?;
        txn.commit().await?;

        Self::map_question(model)
    }

    async fn update_question(
        &self,
        question_id: TemplateQuestionId,
        update: TemplateQuestionUpdate,
    ) -> AppResult<TemplateQuestionRecord> {
        let model = template_question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("template question", question_id))?;

        let mut active_model: template_question::ActiveModel = model.into();
        if let Some(text) = update.text {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(AppError::validation("question text must not be empty"));
            }
            active_model.question_text = Set(text);
        }
        if let Some(is_required) = update.is_required {
            active_model.is_required = Set(is_required);
        }

        let updated = active_model.update(&self.db).await?;
        Self::map_question(updated)
    }

    async fn allocate(
        &self,
        template_id: TemplateId,
        targets: &[AllocationTarget],
        is_active: bool,
    ) -> AppResult<AllocationOutcome> {
        let template = form_template::Entity::find_by_id(template_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("template", template_id))?;

        let plan = AllocationPlan::new(self.snapshot(&template.id).await?)?;
        let directory = TargetDirectory::resolve(&self.db, targets).await?;

        let mut outcome = AllocationOutcome::default();
        for target in targets {
            match self.allocate_one(&template, &plan, &directory, *target, is_active).await? {
                Some(form_id) => outcome.created.push(form_id),
                None => outcome.skipped += 1,
            }
        }

        info!(
            template_id = %template_id,
            questions = plan.question_count(),
            created = outcome.created_count(),
            skipped = outcome.skipped,
            "template allocation finished"
        );

        Ok(outcome)
    }
}
