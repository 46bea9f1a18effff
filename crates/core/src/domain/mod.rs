mod allocation;
mod answer;
mod dashboard;
mod error;
mod ids;
mod naming;
mod question_kind;
mod roll_number;
mod tally;

pub use allocation::{
    AllocationOutcome, AllocationPlan, AllocationTarget, OptionBlueprint, QuestionBlueprint,
    plan_targets,
};
pub use answer::{Answer, AnswerDraft, QuestionSpec, validate_submission};
pub use dashboard::{FormPartition, partition_forms};
pub use error::DomainError;
pub use ids::{
    AllocationId, CourseId, DepartmentId, EnrollmentId, FormId, OptionId, QuestionId, ResponseId,
    SchoolId, StudentId, SubmissionId, TeacherId, TemplateId, TemplateOptionId,
    TemplateQuestionId,
};
pub use naming::{
    MASTER_PREFIX, allocated_form_title, is_master_title, master_base_title, master_copy_title,
    mark_master_title, teacher_label,
};
pub use question_kind::QuestionKind;
pub use roll_number::RollNumber;
pub use tally::{
    McqTally, OptionCount, TextEntry, percentage, percentage_label, tally_options,
};
