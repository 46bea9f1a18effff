use feedback_core::domain::DomainError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("You have already submitted this form.")]
    AlreadySubmitted,

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Maps a unique-constraint rejection to [`AppError::Conflict`] with
    /// `message`; every other database error passes through unchanged.
    pub fn from_write(err: DbErr, message: &str) -> Self {
        if is_unique_violation(&err) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = AppError::not_found("form", "abc");

        assert_eq!(err.to_string(), "form not found: abc");
    }

    #[test]
    fn non_constraint_write_errors_pass_through() {
        let err = AppError::from_write(DbErr::Custom("disk full".to_string()), "duplicate");

        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn domain_errors_keep_their_message() {
        let err = AppError::from(DomainError::RequiredQuestionUnanswered(3));

        assert_eq!(err.to_string(), "Question 3 is required");
    }
}
