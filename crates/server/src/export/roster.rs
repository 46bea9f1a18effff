use chrono::NaiveDateTime;

use super::{CellStyle, SheetLayout, WorkbookLayout};
use crate::repository::Roster;

const MISSING: &str = "N/A";

pub fn roster_layout(roster: &Roster, generated_at: NaiveDateTime) -> WorkbookLayout {
    WorkbookLayout {
        sheets: vec![students_sheet(roster), summary_sheet(roster, generated_at)],
    }
}

pub fn roster_filename(generated_at: NaiveDateTime) -> String {
    format!("Registered_Students_{}.xlsx", generated_at.format("%Y%m%d"))
}

fn students_sheet(roster: &Roster) -> SheetLayout {
    let mut sheet = SheetLayout::new("Registered Students");
    sheet.header_row(
        0,
        &[
            "S.No",
            "Roll Number",
            "Name",
            "School",
            "Department",
            "Enrolled Courses",
            "Registration Date",
        ],
    );

    for (row, (serial, student)) in (1u32..).zip((1u32..).zip(&roster.students)) {
        let courses = if student.course_codes.is_empty() {
            "None".to_string()
        } else {
            student.course_codes.join(", ")
        };

        sheet.number(row, 0, f64::from(serial), CellStyle::Bordered);
        sheet.text(row, 1, student.roll_number.as_str(), CellStyle::Bordered);
        sheet.text(row, 2, student.name.as_str(), CellStyle::Bordered);
        sheet.text(
            row,
            3,
            student.school_name.as_deref().unwrap_or(MISSING),
            CellStyle::Bordered,
        );
        sheet.text(
            row,
            4,
            student.department_name.as_deref().unwrap_or(MISSING),
            CellStyle::Bordered,
        );
        sheet.text(row, 5, courses, CellStyle::Bordered);
        sheet.text(
            row,
            6,
            student.joined_at.format("%Y-%m-%d").to_string(),
            CellStyle::Bordered,
        );
    }

    sheet.widths(&[8.0, 20.0, 30.0, 30.0, 30.0, 40.0, 18.0]);
    sheet
}

fn summary_sheet(roster: &Roster, generated_at: NaiveDateTime) -> SheetLayout {
    let mut sheet = SheetLayout::new("Summary");
    sheet.text(0, 0, "Student Registration Summary", CellStyle::Title);

    sheet.text(2, 0, "Total Students:", CellStyle::Plain);
    sheet.number(2, 1, roster.students.len() as f64, CellStyle::Plain);
    sheet.text(3, 0, "Generated On:", CellStyle::Plain);
    sheet.text(
        3,
        1,
        generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        CellStyle::Plain,
    );

    sheet.text(5, 0, "School-wise Distribution:", CellStyle::Label);
    let mut row = 6u32;
    for (school, count) in &roster.school_counts {
        sheet.text(row, 0, school.as_str(), CellStyle::Plain);
        sheet.number(row, 1, *count as f64, CellStyle::Plain);
        row += 1;
    }

    sheet.text(row + 1, 0, "Department-wise Distribution:", CellStyle::Label);
    row += 2;
    for (department, school, count) in &roster.department_counts {
        sheet.text(row, 0, format!("{department} ({school})"), CellStyle::Plain);
        sheet.number(row, 1, *count as f64, CellStyle::Plain);
        row += 1;
    }

    sheet.widths(&[40.0, 15.0]);
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CellValue;
    use crate::repository::RosterRow;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .and_then(|d| d.and_hms_opt(8, 15, 0))
            .expect("valid timestamp")
    }

    fn roster() -> Roster {
        Roster {
            students: vec![
                RosterRow {
                    roll_number: "21CS001".to_string(),
                    name: "Asha Rao".to_string(),
                    school_name: Some("Engineering".to_string()),
                    department_name: Some("Computer Science".to_string()),
                    course_codes: vec!["CS201".to_string(), "CS202".to_string()],
                    joined_at: at(2),
                },
                RosterRow {
                    roll_number: "21XX009".to_string(),
                    name: "Dev Patel".to_string(),
                    school_name: None,
                    department_name: None,
                    course_codes: Vec::new(),
                    joined_at: at(4),
                },
            ],
            school_counts: vec![("Engineering".to_string(), 1), ("Law".to_string(), 0)],
            department_counts: vec![(
                "Computer Science".to_string(),
                "Engineering".to_string(),
                1,
            )],
        }
    }

    fn text_at(sheet: &SheetLayout, row: u32, col: u16) -> Option<&str> {
        match sheet.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    #[test]
    fn filename_carries_the_date() {
        assert_eq!(roster_filename(at(9)), "Registered_Students_20250109.xlsx");
    }

    #[test]
    fn student_rows_join_courses_and_fill_gaps() {
        let layout = roster_layout(&roster(), at(9));
        let sheet = layout.sheet("Registered Students").expect("students sheet");

        assert_eq!(text_at(sheet, 1, 5), Some("CS201, CS202"));
        assert_eq!(text_at(sheet, 1, 6), Some("2025-01-02"));
        assert_eq!(text_at(sheet, 2, 3), Some("N/A"));
        assert_eq!(text_at(sheet, 2, 4), Some("N/A"));
        assert_eq!(text_at(sheet, 2, 5), Some("None"));
        assert_eq!(
            sheet.cell(2, 0).map(|c| &c.value),
            Some(&CellValue::Number(2.0))
        );
    }

    #[test]
    fn summary_counts_schools_then_departments() {
        let layout = roster_layout(&roster(), at(9));
        let sheet = layout.sheet("Summary").expect("summary sheet");

        assert_eq!(
            sheet.cell(2, 1).map(|c| &c.value),
            Some(&CellValue::Number(2.0))
        );
        assert_eq!(text_at(sheet, 6, 0), Some("Engineering"));
        assert_eq!(text_at(sheet, 7, 0), Some("Law"));
        assert_eq!(text_at(sheet, 9, 0), Some("Department-wise Distribution:"));
        assert_eq!(text_at(sheet, 10, 0), Some("Computer Science (Engineering)"));
    }
}
