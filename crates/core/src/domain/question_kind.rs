use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// How a question is answered. Stored as the tags `mcq` and `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Text,
}

impl QuestionKind {
    pub fn as_tag(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Text => "text",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "Multiple Choice",
            QuestionKind::Text => "Text Response",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for QuestionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" => Ok(QuestionKind::Mcq),
            "text" => Ok(QuestionKind::Text),
            other => Err(DomainError::UnknownQuestionKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QuestionKind;
    use crate::domain::DomainError;

    #[test]
    fn tags_parse_back_to_the_same_kind() {
        for kind in [QuestionKind::Mcq, QuestionKind::Text] {
            assert_eq!(kind.as_tag().parse::<QuestionKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "rating".parse::<QuestionKind>().expect_err("rating is not a kind");

        assert_eq!(err, DomainError::UnknownQuestionKind("rating".to_string()));
        assert_eq!(err.to_string(), "unrecognized question type: 'rating'");
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert!("MCQ".parse::<QuestionKind>().is_err());
    }
}
