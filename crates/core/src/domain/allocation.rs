use std::collections::HashSet;

use super::{CourseId, DomainError, FormId, QuestionKind, TeacherId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionBlueprint {
    pub text: String,
    pub order: i32,
}

/// An owned snapshot of one question, detached from wherever it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlueprint {
    pub text: String,
    pub kind: QuestionKind,
    pub order: i32,
    pub is_required: bool,
    pub options: Vec<OptionBlueprint>,
}

impl QuestionBlueprint {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.kind == QuestionKind::Mcq && self.options.is_empty() {
            return Err(DomainError::McqWithoutOptions(self.order));
        }
        Ok(())
    }
}

/// The question set every allocated form is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    questions: Vec<QuestionBlueprint>,
}

impl AllocationPlan {
    /// Orders questions and options by their stored order and checks the set
    /// can be instantiated: at least one question, and options on every
    /// multiple choice question. Options on text questions are dropped.
    pub fn new(mut questions: Vec<QuestionBlueprint>) -> Result<Self, DomainError> {
        if questions.is_empty() {
            return Err(DomainError::EmptyTemplate);
        }

        questions.sort_by_key(|q| q.order);

        for question in &mut questions {
            question.validate()?;
            match question.kind {
                QuestionKind::Mcq => question.options.sort_by_key(|o| o.order),
                QuestionKind::Text => question.options.clear(),
            }
        }

        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[QuestionBlueprint] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationTarget {
    pub teacher_id: TeacherId,
    pub course_id: CourseId,
}

/// Every teacher paired with every course, teacher-major, duplicates removed.
pub fn plan_targets(teachers: &[TeacherId], courses: &[CourseId]) -> Vec<AllocationTarget> {
    let mut seen = HashSet::new();

    teachers
        .iter()
        .flat_map(|teacher_id| {
            courses.iter().map(move |course_id| AllocationTarget {
                teacher_id: *teacher_id,
                course_id: *course_id,
            })
        })
        .filter(|target| seen.insert(*target))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub created: Vec<FormId>,
    pub skipped: usize,
}

impl AllocationOutcome {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, order: i32) -> OptionBlueprint {
        OptionBlueprint {
            text: text.to_string(),
            order,
        }
    }

    fn question(order: i32, kind: QuestionKind, options: Vec<OptionBlueprint>) -> QuestionBlueprint {
        QuestionBlueprint {
            text: format!("question {order}"),
            kind,
            order,
            is_required: true,
            options,
        }
    }

    #[test]
    fn plan_orders_questions_and_options() {
        let plan = AllocationPlan::new(vec![
            question(2, QuestionKind::Text, vec![]),
            question(
                1,
                QuestionKind::Mcq,
                vec![option("Agree", 2), option("Strongly agree", 1)],
            ),
        ])
        .expect("valid plan");

        let orders: Vec<i32> = plan.questions().iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![1, 2]);

        let texts: Vec<&str> = plan.questions()[0]
            .options
            .iter()
            .map(|o| o.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Strongly agree", "Agree"]);
        assert_eq!(plan.question_count(), 2);
    }

    #[test]
    fn empty_template_cannot_be_planned() {
        assert_eq!(AllocationPlan::new(vec![]), Err(DomainError::EmptyTemplate));
    }

    #[test]
    fn mcq_without_options_is_rejected() {
        let err = AllocationPlan::new(vec![question(3, QuestionKind::Mcq, vec![])])
            .expect_err("mcq needs options");

        assert_eq!(err, DomainError::McqWithoutOptions(3));
    }

    #[test]
    fn text_questions_carry_no_options() {
        let plan = AllocationPlan::new(vec![question(
            1,
            QuestionKind::Text,
            vec![option("stray", 1)],
        )])
        .expect("valid plan");

        assert!(plan.questions()[0].options.is_empty());
    }

    #[test]
    fn targets_are_the_deduplicated_cross_product() {
        let (t1, t2) = (TeacherId::new(), TeacherId::new());
        let (c1, c2) = (CourseId::new(), CourseId::new());

        let targets = plan_targets(&[t1, t2, t1], &[c1, c2]);

        assert_eq!(
            targets,
            vec![
                AllocationTarget { teacher_id: t1, course_id: c1 },
                AllocationTarget { teacher_id: t1, course_id: c2 },
                AllocationTarget { teacher_id: t2, course_id: c1 },
                AllocationTarget { teacher_id: t2, course_id: c2 },
            ]
        );
    }

    #[test]
    fn no_courses_means_no_targets() {
        assert!(plan_targets(&[TeacherId::new()], &[]).is_empty());
    }
}
