use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unrecognized question type: '{0}'")]
    UnknownQuestionKind(String),

    #[error("roll number must not be empty")]
    EmptyRollNumber,

    #[error("invalid roll number length: {0}. max length is 50")]
    InvalidRollNumberLength(usize),

    #[error("template has no questions")]
    EmptyTemplate,

    #[error("multiple choice question {0} has no options")]
    McqWithoutOptions(i32),

    #[error("Question {0} is required")]
    RequiredQuestionUnanswered(i32),

    #[error("question {0} is not part of this form")]
    UnknownQuestion(String),

    #[error("option {option} does not belong to question {question}")]
    ForeignOption { question: i32, option: String },
}
