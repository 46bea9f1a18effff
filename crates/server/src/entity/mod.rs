pub mod course;
pub mod department;
pub mod feedback_form;
pub mod form_allocation;
pub mod form_submission;
pub mod form_template;
pub mod mcq_option;
pub mod question;
pub mod response;
pub mod school;
pub mod student;
pub mod student_course;
pub mod teacher;
pub mod template_option;
pub mod template_question;
