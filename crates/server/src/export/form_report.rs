use chrono::NaiveDateTime;

use super::{CellStyle, SheetLayout, VerticalMerge, WorkbookLayout};
use crate::repository::{FormReport, FormReportHeader, QuestionReportBody};

const SUMMARY_LABELS: [&str; 7] = [
    "Form Title:",
    "Course:",
    "Teacher:",
    "Department:",
    "School:",
    "Total Submissions:",
    "Generated On:",
];

pub fn form_report_layout(report: &FormReport, generated_at: NaiveDateTime) -> WorkbookLayout {
    WorkbookLayout {
        sheets: vec![
            summary_sheet(report, generated_at),
            mcq_sheet(report),
            text_sheet(report),
        ],
    }
}

/// `Feedback_{course code}_{teacher}_{YYYYMMDD}.xlsx`, spaces in the teacher
/// name replaced by underscores.
pub fn form_report_filename(header: &FormReportHeader, generated_at: NaiveDateTime) -> String {
    format!(
        "Feedback_{}_{}_{}.xlsx",
        header.course_code,
        header.teacher_name.replace(' ', "_"),
        generated_at.format("%Y%m%d")
    )
}

fn summary_sheet(report: &FormReport, generated_at: NaiveDateTime) -> SheetLayout {
    let header = &report.header;
    let mut sheet = SheetLayout::new("Summary");
    sheet.text(0, 0, "Feedback Report", CellStyle::Title);

    let values = [
        header.title.clone(),
        format!("{} - {}", header.course_code, header.course_name),
        header.teacher_name.clone(),
        header.department_name.clone(),
        header.school_name.clone(),
    ];
    for (row, (label, value)) in (2u32..).zip(SUMMARY_LABELS.iter().zip(values)) {
        sheet.text(row, 0, *label, CellStyle::Label);
        sheet.text(row, 1, value, CellStyle::Plain);
    }
    sheet.text(7, 0, SUMMARY_LABELS[5], CellStyle::Label);
    sheet.number(7, 1, report.total_submissions as f64, CellStyle::Plain);
    sheet.text(8, 0, SUMMARY_LABELS[6], CellStyle::Label);
    sheet.text(
        8,
        1,
        generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        CellStyle::Plain,
    );

    sheet.widths(&[20.0, 50.0]);
    sheet
}

fn mcq_sheet(report: &FormReport) -> SheetLayout {
    let mut sheet = SheetLayout::new("MCQ Results");
    sheet.header_row(0, &["Question", "Option", "Count", "Percentage"]);

    let mut row = 1u32;
    for question in &report.questions {
        let QuestionReportBody::Mcq(tally) = &question.body else {
            continue;
        };

        let first_row = row;
        for option in &tally.options {
            if row == first_row {
                sheet.text(row, 0, question.label(), CellStyle::BorderedBold);
            }
            sheet.text(row, 1, option.text.as_str(), CellStyle::Bordered);
            sheet.number(row, 2, option.count as f64, CellStyle::Bordered);
            sheet.text(row, 3, tally.label_of(option.count), CellStyle::Bordered);
            row += 1;
        }

        if tally.options.len() > 1 {
            sheet.merges.push(VerticalMerge {
                col: 0,
                first_row,
                last_row: row - 1,
            });
        }
        row += 1;
    }

    sheet.widths(&[50.0, 40.0, 12.0, 12.0]);
    sheet
}

fn text_sheet(report: &FormReport) -> SheetLayout {
    let mut sheet = SheetLayout::new("Text Responses");
    sheet.header_row(0, &["Question", "Student", "Response", "Submitted On"]);

    let mut row = 1u32;
    for question in &report.questions {
        let QuestionReportBody::Text(entries) = &question.body else {
            continue;
        };

        for entry in entries {
            sheet.text(row, 0, question.label(), CellStyle::Bordered);
            sheet.text(row, 1, entry.respondent.as_str(), CellStyle::Bordered);
            sheet.text(row, 2, entry.text.as_str(), CellStyle::BorderedWrapped);
            sheet.text(
                row,
                3,
                entry.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
                CellStyle::Bordered,
            );
            row += 1;
        }
    }

    sheet.widths(&[50.0, 25.0, 60.0, 18.0]);
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{CellValue, MAX_CELL_CHARS, render};
    use crate::repository::QuestionReport;
    use chrono::NaiveDate;
    use feedback_core::domain::{FormId, OptionId, QuestionId, TextEntry, tally_options};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, day)
            .and_then(|d| d.and_hms_opt(hour, 30, 0))
            .expect("valid timestamp")
    }

    fn header() -> FormReportHeader {
        FormReportHeader {
            form_id: FormId::new(),
            title: "Mid-term Feedback - Priya Nair (CS201)".to_string(),
            course_code: "CS201".to_string(),
            course_name: "Data Structures".to_string(),
            teacher_name: "Priya Nair".to_string(),
            department_name: "Computer Science".to_string(),
            school_name: "School of Engineering".to_string(),
        }
    }

    fn report() -> FormReport {
        let (a, b, c) = (OptionId::new(), OptionId::new(), OptionId::new());
        let tally = tally_options(
            [
                (a, "Excellent".to_string(), 1),
                (b, "Good".to_string(), 2),
                (c, "Poor".to_string(), 3),
            ],
            std::iter::repeat_n(a, 6).chain(std::iter::repeat_n(b, 4)),
        );
        let single = tally_options([(OptionId::new(), "Yes".to_string(), 1)], []);

        FormReport {
            header: header(),
            total_submissions: 10,
            questions: vec![
                QuestionReport {
                    id: QuestionId::new(),
                    order: 1,
                    text: "Teaching quality".to_string(),
                    body: QuestionReportBody::Mcq(tally),
                },
                QuestionReport {
                    id: QuestionId::new(),
                    order: 2,
                    text: "Comments".to_string(),
                    body: QuestionReportBody::Text(vec![TextEntry {
                        respondent: "Arjun Mehta".to_string(),
                        text: "More lab time".to_string(),
                        submitted_at: at(3, 9),
                    }]),
                },
                QuestionReport {
                    id: QuestionId::new(),
                    order: 3,
                    text: "Would recommend".to_string(),
                    body: QuestionReportBody::Mcq(single),
                },
            ],
        }
    }

    fn text_at(sheet: &SheetLayout, row: u32, col: u16) -> Option<String> {
        match sheet.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }

    #[test]
    fn filename_uses_course_code_teacher_and_date() {
        assert_eq!(
            form_report_filename(&header(), at(5, 14)),
            "Feedback_CS201_Priya_Nair_20241105.xlsx"
        );
    }

    #[test]
    fn summary_lists_header_fields() {
        let layout = form_report_layout(&report(), at(5, 14));
        let summary = layout.sheet("Summary").expect("summary sheet");

        assert_eq!(text_at(summary, 0, 0).as_deref(), Some("Feedback Report"));
        assert_eq!(
            text_at(summary, 3, 1).as_deref(),
            Some("CS201 - Data Structures")
        );
        assert_eq!(
            summary.cell(7, 1).map(|c| &c.value),
            Some(&CellValue::Number(10.0))
        );
        assert_eq!(
            text_at(summary, 8, 1).as_deref(),
            Some("2024-11-05 14:30:00")
        );
    }

    #[test]
    fn mcq_sheet_keeps_zero_count_options_and_merges_question_cells() {
        let layout = form_report_layout(&report(), at(5, 14));
        let mcq = layout.sheet("MCQ Results").expect("mcq sheet");

        assert_eq!(
            text_at(mcq, 1, 0).as_deref(),
            Some("Q1: Teaching quality")
        );
        assert_eq!(text_at(mcq, 1, 3).as_deref(), Some("60.0%"));
        assert_eq!(text_at(mcq, 2, 3).as_deref(), Some("40.0%"));
        assert_eq!(text_at(mcq, 3, 1).as_deref(), Some("Poor"));
        assert_eq!(text_at(mcq, 3, 3).as_deref(), Some("0.0%"));
        assert_eq!(
            mcq.merges,
            vec![VerticalMerge {
                col: 0,
                first_row: 1,
                last_row: 3,
            }]
        );

        // Blank row, then the single-option question without a merge.
        assert!(mcq.cell(4, 0).is_none());
        assert_eq!(text_at(mcq, 5, 0).as_deref(), Some("Q3: Would recommend"));
        assert_eq!(text_at(mcq, 5, 3).as_deref(), Some("0%"));
    }

    #[test]
    fn text_sheet_lists_each_response() {
        let layout = form_report_layout(&report(), at(5, 14));
        let text = layout.sheet("Text Responses").expect("text sheet");

        assert_eq!(text_at(text, 1, 0).as_deref(), Some("Q2: Comments"));
        assert_eq!(text_at(text, 1, 1).as_deref(), Some("Arjun Mehta"));
        assert_eq!(text_at(text, 1, 3).as_deref(), Some("2024-11-03 09:30"));
        assert_eq!(text.last_row(), Some(1));
    }

    #[test]
    fn text_question_without_responses_leaves_only_the_header() {
        let mut report = report();
        report.questions[1].body = QuestionReportBody::Text(Vec::new());

        let layout = form_report_layout(&report, at(5, 14));
        let text = layout.sheet("Text Responses").expect("text sheet");

        assert_eq!(text.last_row(), Some(0));
    }

    #[test]
    fn oversized_answers_are_cut_to_fit_a_cell() {
        let mut report = report();
        report.questions[1].body = QuestionReportBody::Text(vec![TextEntry {
            respondent: "Arjun Mehta".to_string(),
            text: "é".repeat(40_000),
            submitted_at: at(3, 9),
        }]);

        let layout = form_report_layout(&report, at(5, 14));
        let text = layout.sheet("Text Responses").expect("text sheet");
        let response = text_at(text, 1, 2).expect("response cell");

        assert_eq!(response.chars().count(), MAX_CELL_CHARS);
        let bytes = render(&layout).expect("long answers still render");
        assert!(bytes.starts_with(b"PK"));
    }
}
