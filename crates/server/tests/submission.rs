mod common;

use common::{Campus, campus, feedback_questions};
use feedback_core::domain::{DomainError, FormId, OptionId, QuestionId, SubmissionId};
use feedback_server::entity::{form_submission, response};
use feedback_server::error::{AppError, is_unique_violation};
use feedback_server::repository::{
    FormRepository, NewForm, QuestionRecord, SeaOrmFormRepository, SeaOrmSubmissionRepository,
    SubmissionRepository,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, PaginatorTrait};
use std::collections::HashMap;

async fn open_form(campus: &Campus, course: usize, is_active: bool) -> (FormId, Vec<QuestionRecord>) {
    let forms = SeaOrmFormRepository::new(campus.db.clone());
    let form = forms
        .create(NewForm {
            course_id: campus.courses[course].id,
            teacher_id: campus.teachers[0].id,
            title: format!("Feedback for {}", campus.courses[course].code),
            description: String::new(),
            is_active,
            questions: feedback_questions(),
        })
        .await
        .expect("form should be created");
    let questions = forms.questions(form.id).await.expect("questions");
    (form.id, questions)
}

fn complete_answers(questions: &[QuestionRecord]) -> HashMap<QuestionId, String> {
    HashMap::from([
        (questions[0].id, questions[0].options[1].id.to_string()),
        (questions[1].id, "Clear explanations".to_string()),
    ])
}

async fn stored_rows(campus: &Campus) -> (u64, u64) {
    let submissions = form_submission::Entity::find()
        .count(&campus.db)
        .await
        .expect("count submissions");
    let responses = response::Entity::find()
        .count(&campus.db)
        .await
        .expect("count responses");
    (submissions, responses)
}

#[tokio::test]
async fn test_submission_is_recorded_once() {
    let campus = campus().await;
    let student = campus.register("21CS001", "Asha Rao", &[0]).await;
    let (form_id, questions) = open_form(&campus, 0, true).await;
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());

    submissions
        .submit(form_id, student.id, &complete_answers(&questions))
        .await
        .expect("first submission");
    assert!(
        submissions
            .has_submitted(form_id, student.id)
            .await
            .expect("lookup")
    );

    let err = submissions
        .submit(form_id, student.id, &complete_answers(&questions))
        .await
        .expect_err("second submission");
    assert!(matches!(err, AppError::AlreadySubmitted));

    // Choice, comment and the skipped optional text.
    assert_eq!(stored_rows(&campus).await, (1, 3));
}

#[tokio::test]
async fn test_missing_required_answer_persists_nothing() {
    let campus = campus().await;
    let student = campus.register("21CS002", "Bilal Khan", &[0]).await;
    let (form_id, questions) = open_form(&campus, 0, true).await;
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());

    let answers = HashMap::from([
        (questions[0].id, questions[0].options[0].id.to_string()),
        (questions[1].id, "   ".to_string()),
    ]);
    let err = submissions
        .submit(form_id, student.id, &answers)
        .await
        .expect_err("comment is required");

    assert_eq!(err.to_string(), "Question 2 is required");
    assert_eq!(stored_rows(&campus).await, (0, 0));
    assert!(
        !submissions
            .has_submitted(form_id, student.id)
            .await
            .expect("lookup")
    );
}

#[tokio::test]
async fn test_option_from_elsewhere_is_rejected() {
    let campus = campus().await;
    let student = campus.register("21CS003", "Chen Wei", &[0]).await;
    let (form_id, questions) = open_form(&campus, 0, true).await;
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());

    let mut answers = complete_answers(&questions);
    answers.insert(questions[0].id, OptionId::new().to_string());

    let err = submissions
        .submit(form_id, student.id, &answers)
        .await
        .expect_err("unknown option");

    assert!(matches!(
        err,
        AppError::Domain(DomainError::ForeignOption { question: 1, .. })
    ));
    assert_eq!(stored_rows(&campus).await, (0, 0));
}

#[tokio::test]
async fn test_closed_or_unknown_forms_are_not_found() {
    let campus = campus().await;
    let student = campus.register("21CS004", "Dana Levi", &[0]).await;
    let (closed, questions) = open_form(&campus, 0, false).await;
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());

    let err = submissions
        .submit(closed, student.id, &complete_answers(&questions))
        .await
        .expect_err("inactive form");
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = submissions
        .submit(FormId::new(), student.id, &HashMap::new())
        .await
        .expect_err("missing form");
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_dashboard_partitions_enrolled_forms() {
    let campus = campus().await;
    let student = campus.register("21CS005", "Esi Mensah", &[0, 1]).await;
    let (first, questions) = open_form(&campus, 0, true).await;
    let (second, _) = open_form(&campus, 1, true).await;
    let (_other_course, _) = open_form(&campus, 2, true).await;
    let (_inactive, _) = open_form(&campus, 0, false).await;

    SeaOrmSubmissionRepository::new(campus.db.clone())
        .submit(first, student.id, &complete_answers(&questions))
        .await
        .expect("submission");

    let partition = SeaOrmFormRepository::new(campus.db.clone())
        .dashboard(student.id)
        .await
        .expect("dashboard");

    let pending: Vec<FormId> = partition.pending.iter().map(|f| f.id).collect();
    let completed: Vec<FormId> = partition.completed.iter().map(|f| f.id).collect();
    assert_eq!(pending, vec![second]);
    assert_eq!(completed, vec![first]);
    assert_eq!(partition.pending[0].course_code, "CS202");
}

#[tokio::test]
async fn test_storage_rejects_second_submission_row() {
    let campus = campus().await;
    let student = campus.register("21CS006", "Femi Adeyemi", &[0]).await;
    let (form_id, questions) = open_form(&campus, 0, true).await;
    SeaOrmSubmissionRepository::new(campus.db.clone())
        .submit(form_id, student.id, &complete_answers(&questions))
        .await
        .expect("submission");

    let err = form_submission::ActiveModel {
        id: Set(SubmissionId::new().to_string()),
        form_id: Set(form_id.to_string()),
        student_id: Set(student.id.to_string()),
        submitted_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(&campus.db)
    .await
    .expect_err("one submission per student and form");

    assert!(is_unique_violation(&err));
    assert_eq!(stored_rows(&campus).await, (1, 3));
}

#[tokio::test]
async fn test_concurrent_submissions_record_one() {
    let campus = campus().await;
    let student = campus.register("21CS007", "Gita Sharma", &[0]).await;
    let (form_id, questions) = open_form(&campus, 0, true).await;
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());
    let answers = complete_answers(&questions);

    let (first, second) = tokio::join!(
        submissions.submit(form_id, student.id, &answers),
        submissions.submit(form_id, student.id, &answers),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes
        .into_iter()
        .find_map(Result::err)
        .expect("one attempt loses");
    assert!(matches!(
        loser,
        AppError::AlreadySubmitted | AppError::Conflict(_)
    ));
    assert_eq!(stored_rows(&campus).await, (1, 3));
}
