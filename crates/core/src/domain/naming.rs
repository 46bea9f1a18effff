pub const MASTER_PREFIX: &str = "[MASTER]";

pub fn teacher_label(name: &str, employee_id: Option<&str>) -> String {
    match employee_id {
        Some(employee_id) => format!("{name} ({employee_id})"),
        None => name.to_string(),
    }
}

/// Title of a form generated from a template allocation.
pub fn allocated_form_title(template_name: &str, teacher_name: &str, course_code: &str) -> String {
    format!("{template_name} - {teacher_name} ({course_code})")
}

/// Legacy convention: a form whose title mentions MASTER or TEMPLATE is a
/// master form and is copied rather than filled in.
pub fn is_master_title(title: &str) -> bool {
    let upper = title.to_uppercase();
    upper.contains("MASTER") || upper.contains("TEMPLATE")
}

/// Returns the retitled form, or `None` when the title already carries the
/// master marker.
pub fn mark_master_title(title: &str) -> Option<String> {
    if title.to_uppercase().contains("MASTER") {
        return None;
    }
    Some(format!("{MASTER_PREFIX} {title}"))
}

pub fn master_base_title(title: &str) -> String {
    title.replace(MASTER_PREFIX, "").trim().to_string()
}

pub fn master_copy_title(course_code: &str, teacher_name: &str, base_title: &str) -> String {
    format!("{course_code} - {teacher_name} ({base_title})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_label_includes_employee_id_when_present() {
        assert_eq!(teacher_label("R. Iyer", Some("EMP-104")), "R. Iyer (EMP-104)");
        assert_eq!(teacher_label("R. Iyer", None), "R. Iyer");
    }

    #[test]
    fn allocated_title_names_template_teacher_and_course() {
        assert_eq!(
            allocated_form_title("Mid-term Feedback", "R. Iyer", "CS201"),
            "Mid-term Feedback - R. Iyer (CS201)"
        );
    }

    #[test]
    fn master_detection_is_case_insensitive() {
        assert!(is_master_title("[MASTER] Course Feedback"));
        assert!(is_master_title("feedback template 2024"));
        assert!(!is_master_title("CS201 - R. Iyer (Course Feedback)"));
    }

    #[test]
    fn marking_prefixes_once() {
        let marked = mark_master_title("Course Feedback").expect("not yet a master");

        assert_eq!(marked, "[MASTER] Course Feedback");
        assert_eq!(mark_master_title(&marked), None);
        assert_eq!(mark_master_title("old master copy"), None);
    }

    #[test]
    fn base_title_strips_the_marker() {
        assert_eq!(master_base_title("[MASTER] Course Feedback"), "Course Feedback");
        assert_eq!(
            master_copy_title("CS201", "R. Iyer", "Course Feedback"),
            "CS201 - R. Iyer (Course Feedback)"
        );
    }
}
