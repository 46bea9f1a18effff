use std::collections::HashMap;

use super::{DomainError, OptionId, QuestionId, QuestionKind};

/// The parts of a stored question that submission validation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpec {
    pub id: QuestionId,
    pub order: i32,
    pub kind: QuestionKind,
    pub is_required: bool,
    pub option_ids: Vec<OptionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(OptionId),
    Text(String),
}

impl Answer {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Answer::Choice(_) => QuestionKind::Mcq,
            Answer::Text(_) => QuestionKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDraft {
    pub question_id: QuestionId,
    pub answer: Answer,
}

/// Turns raw form values into the responses to persist.
///
/// `questions` must be in display order: the first unmet required question in
/// that order is the one reported. Nothing is returned unless every question
/// passes, so callers never persist a partial answer set.
pub fn validate_submission(
    questions: &[QuestionSpec],
    raw: &HashMap<QuestionId, String>,
) -> Result<Vec<AnswerDraft>, DomainError> {
    if let Some(unknown) = raw
        .keys()
        .find(|id| !questions.iter().any(|q| q.id == **id))
    {
        return Err(DomainError::UnknownQuestion(unknown.to_string()));
    }

    let mut drafts = Vec::with_capacity(questions.len());

    for question in questions {
        let value = raw
            .get(&question.id)
            .map(|v| v.trim())
            .unwrap_or_default();

        match question.kind {
            QuestionKind::Mcq => {
                if value.is_empty() {
                    if question.is_required {
                        return Err(DomainError::RequiredQuestionUnanswered(question.order));
                    }
                    continue;
                }

                let option_id = value
                    .parse::<OptionId>()
                    .ok()
                    .filter(|id| question.option_ids.contains(id))
                    .ok_or_else(|| DomainError::ForeignOption {
                        question: question.order,
                        option: value.to_string(),
                    })?;

                drafts.push(AnswerDraft {
                    question_id: question.id,
                    answer: Answer::Choice(option_id),
                });
            }
            QuestionKind::Text => {
                if value.is_empty() && question.is_required {
                    return Err(DomainError::RequiredQuestionUnanswered(question.order));
                }

                drafts.push(AnswerDraft {
                    question_id: question.id,
                    answer: Answer::Text(value.to_string()),
                });
            }
        }
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(order: i32, required: bool, options: usize) -> QuestionSpec {
        QuestionSpec {
            id: QuestionId::new(),
            order,
            kind: QuestionKind::Mcq,
            is_required: required,
            option_ids: (0..options).map(|_| OptionId::new()).collect(),
        }
    }

    fn text(order: i32, required: bool) -> QuestionSpec {
        QuestionSpec {
            id: QuestionId::new(),
            order,
            kind: QuestionKind::Text,
            is_required: required,
            option_ids: Vec::new(),
        }
    }

    #[test]
    fn complete_answers_produce_one_draft_per_question() {
        let q1 = mcq(1, true, 3);
        let q2 = text(2, true);
        let picked = q1.option_ids[1];
        let raw = HashMap::from([
            (q1.id, picked.to_string()),
            (q2.id, "  clear explanations ".to_string()),
        ]);

        let drafts = validate_submission(&[q1.clone(), q2.clone()], &raw).expect("valid");

        assert_eq!(
            drafts,
            vec![
                AnswerDraft {
                    question_id: q1.id,
                    answer: Answer::Choice(picked),
                },
                AnswerDraft {
                    question_id: q2.id,
                    answer: Answer::Text("clear explanations".to_string()),
                },
            ]
        );
    }

    #[test]
    fn first_unmet_required_question_is_named() {
        let q1 = mcq(1, true, 2);
        let q2 = text(2, true);
        let q3 = mcq(3, true, 2);
        let raw = HashMap::from([(q1.id, q1.option_ids[0].to_string())]);

        let err = validate_submission(&[q1, q2, q3], &raw).expect_err("q2 is missing");

        assert_eq!(err, DomainError::RequiredQuestionUnanswered(2));
        assert_eq!(err.to_string(), "Question 2 is required");
    }

    #[test]
    fn whitespace_only_text_does_not_satisfy_a_required_question() {
        let q = text(4, true);
        let raw = HashMap::from([(q.id, "   ".to_string())]);

        let err = validate_submission(&[q], &raw).expect_err("blank text");

        assert_eq!(err, DomainError::RequiredQuestionUnanswered(4));
    }

    #[test]
    fn optional_questions_may_be_skipped() {
        let q1 = mcq(1, false, 2);
        let q2 = text(2, false);

        let drafts = validate_submission(&[q1, q2.clone()], &HashMap::new()).expect("valid");

        assert_eq!(
            drafts,
            vec![AnswerDraft {
                question_id: q2.id,
                answer: Answer::Text(String::new()),
            }]
        );
    }

    #[test]
    fn option_from_another_question_is_rejected() {
        let q1 = mcq(1, true, 2);
        let q2 = mcq(2, true, 2);
        let raw = HashMap::from([
            (q1.id, q2.option_ids[0].to_string()),
            (q2.id, q2.option_ids[0].to_string()),
        ]);

        let err = validate_submission(&[q1, q2.clone()], &raw).expect_err("foreign option");

        assert_eq!(
            err,
            DomainError::ForeignOption {
                question: 1,
                option: q2.option_ids[0].to_string(),
            }
        );
    }

    #[test]
    fn answer_for_unknown_question_is_rejected() {
        let q = text(1, false);
        let stray = QuestionId::new();
        let raw = HashMap::from([(stray, "hello".to_string())]);

        let err = validate_submission(&[q], &raw).expect_err("stray question");

        assert_eq!(err, DomainError::UnknownQuestion(stray.to_string()));
    }
}
