use feedback_core::domain::{
    AllocationTarget, CourseId, FormId, OptionId, QuestionBlueprint, QuestionId, QuestionKind,
    TeacherId,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter,
};
use std::collections::{HashMap, HashSet};

use super::now;
use crate::entity::{course, feedback_form, mcq_option, question, teacher};
use crate::error::{AppError, AppResult};

/// Teacher names and course codes for every allocation target.
pub(crate) struct TargetDirectory {
    teachers: HashMap<String, String>,
    courses: HashMap<String, String>,
}

impl TargetDirectory {
    /// Loads all targets in two queries. Any unknown teacher or course fails
    /// the whole batch before a single form is written.
    pub(crate) async fn resolve<C>(conn: &C, targets: &[AllocationTarget]) -> AppResult<Self>
    where
        C: ConnectionTrait,
    {
        let teacher_ids: HashSet<String> =
            targets.iter().map(|t| t.teacher_id.to_string()).collect();
        let course_ids: HashSet<String> = targets.iter().map(|t| t.course_id.to_string()).collect();

        let teachers: HashMap<String, String> = teacher::Entity::find()
            .filter(teacher::Column::Id.is_in(teacher_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let courses: HashMap<String, String> = course::Entity::find()
            .filter(course::Column::Id.is_in(course_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|c| (c.id, c.code))
            .collect();

        for target in targets {
            if !teachers.contains_key(&target.teacher_id.to_string()) {
                return Err(AppError::not_found("teacher", target.teacher_id));
            }
            if !courses.contains_key(&target.course_id.to_string()) {
                return Err(AppError::not_found("course", target.course_id));
            }
        }

        Ok(Self { teachers, courses })
    }

    /// `(teacher name, course code)` for a resolved target.
    pub(crate) fn names(&self, target: &AllocationTarget) -> AppResult<(&str, &str)> {
        let teacher = self
            .teachers
            .get(&target.teacher_id.to_string())
            .ok_or_else(|| AppError::not_found("teacher", target.teacher_id))?;
        let course = self
            .courses
            .get(&target.course_id.to_string())
            .ok_or_else(|| AppError::not_found("course", target.course_id))?;
        Ok((teacher.as_str(), course.as_str()))
    }
}

pub(crate) struct FormDraft<'a> {
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub questions: &'a [QuestionBlueprint],
}

/// Writes a form with fresh rows for every question and option. Callers run
/// this inside a transaction so a form is never visible without its questions.
pub(crate) async fn insert_form<C>(conn: &C, draft: FormDraft<'_>) -> Result<FormId, DbErr>
where
    C: ConnectionTrait,
{
    let form_id = FormId::new();
    let created_at = now();

    feedback_form::ActiveModel {
        id: Set(form_id.to_string()),
        course_id: Set(draft.course_id.to_string()),
        teacher_id: Set(draft.teacher_id.to_string()),
        title: Set(draft.title),
        description: Set(draft.description),
        is_active: Set(draft.is_active),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(conn)
    .await?;

    for blueprint in draft.questions {
        let question_id = QuestionId::new();

        question::ActiveModel {
            id: Set(question_id.to_string()),
            form_id: Set(form_id.to_string()),
            question_text: Set(blueprint.text.clone()),
            question_type: Set(blueprint.kind.as_tag().to_string()),
            display_order: Set(blueprint.order),
            is_required: Set(blueprint.is_required),
        }
        .insert(conn)
        .await?;

        if blueprint.kind != QuestionKind::Mcq {
            continue;
        }

        for option in &blueprint.options {
            mcq_option::ActiveModel {
                id: Set(OptionId::new().to_string()),
                question_id: Set(question_id.to_string()),
                option_text: Set(option.text.clone()),
                display_order: Set(option.order),
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(form_id)
}
