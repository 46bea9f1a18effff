use crate::entity::{feedback_form, form_submission, response, student};
use crate::error::{AppError, AppResult, is_unique_violation};
use async_trait::async_trait;
use feedback_core::domain::{
    Answer, FormId, QuestionId, ResponseId, StudentId, SubmissionId, validate_submission,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use std::collections::HashMap;
use tracing::{info, warn};

use super::form_repository::{FormRepository, QuestionRecord, SeaOrmFormRepository};
use super::now;

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn has_submitted(&self, form_id: FormId, student_id: StudentId) -> AppResult<bool>;
    /// Validates every answer, then records the submission and its responses
    /// in one transaction.
    async fn submit(
        &self,
        form_id: FormId,
        student_id: StudentId,
        answers: &HashMap<QuestionId, String>,
    ) -> AppResult<SubmissionId>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
    forms: SeaOrmFormRepository,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            forms: SeaOrmFormRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn has_submitted(&self, form_id: FormId, student_id: StudentId) -> AppResult<bool> {
        let existing = form_submission::Entity::find()
            .filter(form_submission::Column::FormId.eq(form_id.to_string()))
            .filter(form_submission::Column::StudentId.eq(student_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(existing.is_some())
    }

    async fn submit(
        &self,
        form_id: FormId,
        student_id: StudentId,
        answers: &HashMap<QuestionId, String>,
    ) -> AppResult<SubmissionId> {
        let form_is_open = feedback_form::Entity::find_by_id(form_id.to_string())
            .one(&self.db)
            .await?
            .is_some_and(|form| form.is_active);
        if !form_is_open {
            return Err(AppError::not_found("form", form_id));
        }

        let student_exists = student::Entity::find_by_id(student_id.to_string())
            .one(&self.db)
            .await?
            .is_some();
        if !student_exists {
            return Err(AppError::not_found("student", student_id));
        }

        if self.has_submitted(form_id, student_id).await? {
            return Err(AppError::AlreadySubmitted);
        }

        let specs: Vec<_> = self
            .forms
            .questions(form_id)
            .await?
            .iter()
            .map(QuestionRecord::to_spec)
            .collect();
        let drafts = validate_submission(&specs, answers)?;

        let submission_id = SubmissionId::new();
        let txn = self.db.begin().await?;

        let inserted = form_submission::ActiveModel {
            id: Set(submission_id.to_string()),
            form_id: Set(form_id.to_string()),
            student_id: Set(student_id.to_string()),
            submitted_at: Set(now()),
        }
        .insert(&txn)
        .await;

        if let Err(err) = inserted {
            txn.rollback().await?;
            if is_unique_violation(&err) {
                warn!(form_id = %form_id, student_id = %student_id, "concurrent duplicate submission");
                return Err(AppError::Conflict(
                    "This submission conflicts with another request.".to_string(),
                ));
            }
            return Err(err.into());
        }

        for draft in &drafts {
            let (mcq_option_id, text_answer) = match &draft.answer {
                Answer::Choice(option_id) => (Some(option_id.to_string()), String::new()),
                Answer::Text(text) => (None, text.clone()),
            };

            response::ActiveModel {
                id: Set(ResponseId::new().to_string()),
                submission_id: Set(submission_id.to_string()),
                question_id: Set(draft.question_id.to_string()),
                mcq_option_id: Set(mcq_option_id),
                text_answer: Set(text_answer),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                AppError::from_write(e, "This submission conflicts with another request.")
            })?;
        }

        txn.commit().await?;
        info!(
            form_id = %form_id,
            student_id = %student_id,
            responses = drafts.len(),
            "feedback submitted"
        );

        Ok(submission_id)
    }
}
