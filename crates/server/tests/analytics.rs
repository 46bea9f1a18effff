mod common;

use common::{campus, mcq, text};
use feedback_core::domain::QuestionId;
use feedback_server::export::{CellValue, form_report_layout, roster_layout};
use feedback_server::repository::{
    AnalyticsRepository, FormRepository, NewForm, QuestionReportBody, SeaOrmAnalyticsRepository,
    SeaOrmFormRepository, SeaOrmSubmissionRepository, SubmissionRepository,
};
use std::collections::HashMap;

#[tokio::test]
async fn test_report_zero_fills_options_and_empty_text() {
    let campus = campus().await;
    let forms = SeaOrmFormRepository::new(campus.db.clone());
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());
    let analytics = SeaOrmAnalyticsRepository::new(campus.db.clone());

    let form = forms
        .create(NewForm {
            course_id: campus.courses[0].id,
            teacher_id: campus.teachers[0].id,
            title: "Pace Check".to_string(),
            description: String::new(),
            is_active: true,
            questions: vec![
                mcq(1, "How is the pace?", &["A", "B", "C"], true),
                text(2, "Comments", false),
            ],
        })
        .await
        .expect("form should be created");
    let questions = forms.questions(form.id).await.expect("questions");

    for i in 0..10 {
        let student = campus
            .register(&format!("22CS{i:03}"), &format!("Student {i}"), &[0])
            .await;
        let pick = if i < 6 { 0 } else { 1 };
        let answers: HashMap<QuestionId, String> = HashMap::from([(
            questions[0].id,
            questions[0].options[pick].id.to_string(),
        )]);
        submissions
            .submit(form.id, student.id, &answers)
            .await
            .expect("submission");
    }

    let report = analytics.form_report(form.id).await.expect("report");
    assert_eq!(report.total_submissions, 10);
    assert_eq!(report.header.course_code, "CS201");
    assert_eq!(report.header.school_name, "School of Engineering");

    let QuestionReportBody::Mcq(tally) = &report.questions[0].body else {
        panic!("first question is multiple choice");
    };
    let rows: Vec<(&str, u64, String)> = tally
        .options
        .iter()
        .map(|o| (o.text.as_str(), o.count, tally.label_of(o.count)))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("A", 6, "60.0%".to_string()),
            ("B", 4, "40.0%".to_string()),
            ("C", 0, "0.0%".to_string()),
        ]
    );
    assert_eq!(report.questions[0].total_responses(), 10);

    let QuestionReportBody::Text(entries) = &report.questions[1].body else {
        panic!("second question is free text");
    };
    assert!(entries.is_empty());
    assert_eq!(report.questions[1].total_responses(), 0);

    let layout = form_report_layout(&report, chrono::Local::now().naive_local());
    let text_sheet = layout.sheet("Text Responses").expect("text sheet");
    assert_eq!(text_sheet.last_row(), Some(0));
    let mcq_sheet = layout.sheet("MCQ Results").expect("mcq sheet");
    assert_eq!(
        mcq_sheet.cell(3, 1).map(|c| &c.value),
        Some(&CellValue::Text("C".to_string()))
    );
}

#[tokio::test]
async fn test_text_answers_carry_respondent() {
    let campus = campus().await;
    let forms = SeaOrmFormRepository::new(campus.db.clone());
    let submissions = SeaOrmSubmissionRepository::new(campus.db.clone());

    let form = forms
        .create(NewForm {
            course_id: campus.courses[1].id,
            teacher_id: campus.teachers[1].id,
            title: "Open Feedback".to_string(),
            description: String::new(),
            is_active: true,
            questions: vec![text(1, "Comments", false)],
        })
        .await
        .expect("form should be created");
    let questions = forms.questions(form.id).await.expect("questions");

    for (roll, name, comment) in [
        ("23CS001", "Farah Aziz", "More worked examples"),
        ("23CS002", "Goran Ilic", ""),
    ] {
        let student = campus.register(roll, name, &[1]).await;
        let answers = HashMap::from([(questions[0].id, comment.to_string())]);
        submissions
            .submit(form.id, student.id, &answers)
            .await
            .expect("submission");
    }

    let report = SeaOrmAnalyticsRepository::new(campus.db.clone())
        .form_report(form.id)
        .await
        .expect("report");

    let QuestionReportBody::Text(entries) = &report.questions[0].body else {
        panic!("free text question");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].respondent, "Farah Aziz");
    assert_eq!(entries[0].text, "More worked examples");
}

#[tokio::test]
async fn test_roster_lists_students_with_courses() {
    let campus = campus().await;
    campus.register("24CS002", "Zara Ahmed", &[0, 2]).await;
    campus.register("24CS001", "Ben Osei", &[1]).await;

    let roster = SeaOrmAnalyticsRepository::new(campus.db.clone())
        .roster()
        .await
        .expect("roster");

    let names: Vec<&str> = roster.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ben Osei", "Zara Ahmed"]);
    assert_eq!(roster.students[1].course_codes, vec!["CS201", "CS203"]);
    assert_eq!(
        roster.school_counts,
        vec![("School of Engineering".to_string(), 2)]
    );
    assert_eq!(
        roster.department_counts,
        vec![(
            "Computer Science".to_string(),
            "School of Engineering".to_string(),
            2
        )]
    );

    let layout = roster_layout(&roster, chrono::Local::now().naive_local());
    let sheet = layout.sheet("Registered Students").expect("students sheet");
    assert_eq!(
        sheet.cell(2, 5).map(|c| &c.value),
        Some(&CellValue::Text("CS201, CS203".to_string()))
    );
}
