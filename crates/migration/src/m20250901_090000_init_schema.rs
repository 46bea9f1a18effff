use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_catalog(manager).await?;
        create_people(manager).await?;
        create_templates(manager).await?;
        create_forms(manager).await?;
        create_submissions(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Response::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FormSubmission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FormAllocation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(McqOption::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FeedbackForm::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TemplateOption::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TemplateQuestion::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FormTemplate::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teacher::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentCourse::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(School::Table).to_owned())
            .await?;

        Ok(())
    }
}

async fn create_catalog(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(School::Table)
                .if_not_exists()
                .col(string_len(School::Id, 36).primary_key())
                .col(string_len(School::Name, 200))
                .col(string_len(School::Code, 50).unique_key())
                .col(text(School::Description))
                .col(timestamp(School::CreatedAt).default(Expr::current_timestamp()))
                .col(timestamp(School::UpdatedAt).default(Expr::current_timestamp()))
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Department::Table)
                .if_not_exists()
                .col(string_len(Department::Id, 36).primary_key())
                .col(string_len(Department::SchoolId, 36))
                .col(string_len(Department::Name, 200))
                .col(string_len(Department::Code, 50))
                .col(text(Department::Description))
                .col(timestamp(Department::CreatedAt).default(Expr::current_timestamp()))
                .col(timestamp(Department::UpdatedAt).default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-department-school_id")
                        .from(Department::Table, Department::SchoolId)
                        .to(School::Table, School::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_department_school_code")
                .table(Department::Table)
                .col(Department::SchoolId)
                .col(Department::Code)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Course::Table)
                .if_not_exists()
                .col(string_len(Course::Id, 36).primary_key())
                .col(string_len(Course::DepartmentId, 36))
                .col(string_len(Course::Name, 200))
                .col(string_len(Course::Code, 50))
                .col(integer(Course::Semester))
                .col(integer(Course::Year))
                .col(text(Course::Description))
                .col(timestamp(Course::CreatedAt).default(Expr::current_timestamp()))
                .col(timestamp(Course::UpdatedAt).default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-course-department_id")
                        .from(Course::Table, Course::DepartmentId)
                        .to(Department::Table, Department::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_course_department_code_term")
                .table(Course::Table)
                .col(Course::DepartmentId)
                .col(Course::Code)
                .col(Course::Year)
                .col(Course::Semester)
                .unique()
                .to_owned(),
        )
        .await
}

async fn create_people(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Student::Table)
                .if_not_exists()
                .col(string_len(Student::Id, 36).primary_key())
                .col(string_len(Student::RollNumber, 50).unique_key())
                .col(string_len(Student::Name, 200))
                .col(string_len_null(Student::SchoolId, 36))
                .col(string_len_null(Student::DepartmentId, 36))
                .col(boolean(Student::IsActive).default(true))
                .col(boolean(Student::IsStaff).default(false))
                .col(timestamp(Student::JoinedAt).default(Expr::current_timestamp()))
                // Students outlive catalog reorganisation.
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-student-school_id")
                        .from(Student::Table, Student::SchoolId)
                        .to(School::Table, School::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-student-department_id")
                        .from(Student::Table, Student::DepartmentId)
                        .to(Department::Table, Department::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(StudentCourse::Table)
                .if_not_exists()
                .col(string_len(StudentCourse::Id, 36).primary_key())
                .col(string_len(StudentCourse::StudentId, 36))
                .col(string_len(StudentCourse::CourseId, 36))
                .col(timestamp(StudentCourse::EnrolledAt).default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-student_course-student_id")
                        .from(StudentCourse::Table, StudentCourse::StudentId)
                        .to(Student::Table, Student::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-student_course-course_id")
                        .from(StudentCourse::Table, StudentCourse::CourseId)
                        .to(Course::Table, Course::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_student_course_pair")
                .table(StudentCourse::Table)
                .col(StudentCourse::StudentId)
                .col(StudentCourse::CourseId)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Teacher::Table)
                .if_not_exists()
                .col(string_len(Teacher::Id, 36).primary_key())
                .col(string_len(Teacher::Name, 200))
                .col(string_len(Teacher::Email, 254).unique_key())
                .col(string_len_null(Teacher::EmployeeId, 50).unique_key())
                .col(string_len(Teacher::DepartmentId, 36))
                .col(timestamp(Teacher::CreatedAt).default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-teacher-department_id")
                        .from(Teacher::Table, Teacher::DepartmentId)
                        .to(Department::Table, Department::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    Ok(())
}

async fn create_templates(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(FormTemplate::Table)
                .if_not_exists()
                .col(string_len(FormTemplate::Id, 36).primary_key())
                .col(string_len(FormTemplate::Name, 200).unique_key())
                .col(text(FormTemplate::Description))
                .col(boolean(FormTemplate::IsActive).default(true))
                .col(timestamp(FormTemplate::CreatedAt).default(Expr::current_timestamp()))
                .col(timestamp(FormTemplate::UpdatedAt).default(Expr::current_timestamp()))
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(TemplateQuestion::Table)
                .if_not_exists()
                .col(string_len(TemplateQuestion::Id, 36).primary_key())
                .col(string_len(TemplateQuestion::TemplateId, 36))
                .col(text(TemplateQuestion::QuestionText))
                // QuestionKind tag, validated in app code: "mcq" | "text"
                .col(string_len(TemplateQuestion::QuestionType, 10))
                .col(integer(TemplateQuestion::DisplayOrder).default(0))
                .col(boolean(TemplateQuestion::IsRequired).default(true))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-template_question-template_id")
                        .from(TemplateQuestion::Table, TemplateQuestion::TemplateId)
                        .to(FormTemplate::Table, FormTemplate::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(TemplateOption::Table)
                .if_not_exists()
                .col(string_len(TemplateOption::Id, 36).primary_key())
                .col(string_len(TemplateOption::QuestionId, 36))
                .col(string_len(TemplateOption::OptionText, 200))
                .col(integer(TemplateOption::DisplayOrder).default(0))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-template_option-question_id")
                        .from(TemplateOption::Table, TemplateOption::QuestionId)
                        .to(TemplateQuestion::Table, TemplateQuestion::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    Ok(())
}

async fn create_forms(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(FeedbackForm::Table)
                .if_not_exists()
                .col(string_len(FeedbackForm::Id, 36).primary_key())
                .col(string_len(FeedbackForm::CourseId, 36))
                .col(string_len(FeedbackForm::TeacherId, 36))
                .col(string_len(FeedbackForm::Title, 200))
                .col(text(FeedbackForm::Description))
                .col(boolean(FeedbackForm::IsActive).default(true))
                .col(timestamp(FeedbackForm::CreatedAt).default(Expr::current_timestamp()))
                .col(timestamp(FeedbackForm::UpdatedAt).default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-feedback_form-course_id")
                        .from(FeedbackForm::Table, FeedbackForm::CourseId)
                        .to(Course::Table, Course::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-feedback_form-teacher_id")
                        .from(FeedbackForm::Table, FeedbackForm::TeacherId)
                        .to(Teacher::Table, Teacher::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_feedback_form_course_id")
                .table(FeedbackForm::Table)
                .col(FeedbackForm::CourseId)
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Question::Table)
                .if_not_exists()
                .col(string_len(Question::Id, 36).primary_key())
                .col(string_len(Question::FormId, 36))
                .col(text(Question::QuestionText))
                // QuestionKind tag, validated in app code: "mcq" | "text"
                .col(string_len(Question::QuestionType, 10))
                .col(integer(Question::DisplayOrder).default(0))
                .col(boolean(Question::IsRequired).default(true))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-question-form_id")
                        .from(Question::Table, Question::FormId)
                        .to(FeedbackForm::Table, FeedbackForm::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(McqOption::Table)
                .if_not_exists()
                .col(string_len(McqOption::Id, 36).primary_key())
                .col(string_len(McqOption::QuestionId, 36))
                .col(string_len(McqOption::OptionText, 200))
                .col(integer(McqOption::DisplayOrder).default(0))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-mcq_option-question_id")
                        .from(McqOption::Table, McqOption::QuestionId)
                        .to(Question::Table, Question::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(FormAllocation::Table)
                .if_not_exists()
                .col(string_len(FormAllocation::Id, 36).primary_key())
                .col(string_len(FormAllocation::TemplateId, 36))
                .col(string_len(FormAllocation::TeacherId, 36))
                .col(string_len(FormAllocation::CourseId, 36))
                .col(boolean(FormAllocation::IsActive).default(true))
                .col(timestamp(FormAllocation::AllocatedAt).default(Expr::current_timestamp()))
                .col(string_len_null(FormAllocation::FeedbackFormId, 36).unique_key())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-form_allocation-template_id")
                        .from(FormAllocation::Table, FormAllocation::TemplateId)
                        .to(FormTemplate::Table, FormTemplate::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-form_allocation-teacher_id")
                        .from(FormAllocation::Table, FormAllocation::TeacherId)
                        .to(Teacher::Table, Teacher::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-form_allocation-course_id")
                        .from(FormAllocation::Table, FormAllocation::CourseId)
                        .to(Course::Table, Course::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-form_allocation-feedback_form_id")
                        .from(FormAllocation::Table, FormAllocation::FeedbackFormId)
                        .to(FeedbackForm::Table, FeedbackForm::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_form_allocation_triple")
                .table(FormAllocation::Table)
                .col(FormAllocation::TemplateId)
                .col(FormAllocation::TeacherId)
                .col(FormAllocation::CourseId)
                .unique()
                .to_owned(),
        )
        .await?;

    Ok(())
}

async fn create_submissions(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(FormSubmission::Table)
                .if_not_exists()
                .col(string_len(FormSubmission::Id, 36).primary_key())
                .col(string_len(FormSubmission::FormId, 36))
                .col(string_len(FormSubmission::StudentId, 36))
                .col(timestamp(FormSubmission::SubmittedAt).default(Expr::current_timestamp()))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-form_submission-form_id")
                        .from(FormSubmission::Table, FormSubmission::FormId)
                        .to(FeedbackForm::Table, FeedbackForm::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-form_submission-student_id")
                        .from(FormSubmission::Table, FormSubmission::StudentId)
                        .to(Student::Table, Student::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_form_submission_form_student")
                .table(FormSubmission::Table)
                .col(FormSubmission::FormId)
                .col(FormSubmission::StudentId)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Response::Table)
                .if_not_exists()
                .col(string_len(Response::Id, 36).primary_key())
                .col(string_len(Response::SubmissionId, 36))
                .col(string_len(Response::QuestionId, 36))
                .col(string_len_null(Response::McqOptionId, 36))
                .col(text(Response::TextAnswer))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-response-submission_id")
                        .from(Response::Table, Response::SubmissionId)
                        .to(FormSubmission::Table, FormSubmission::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-response-question_id")
                        .from(Response::Table, Response::QuestionId)
                        .to(Question::Table, Question::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk-response-mcq_option_id")
                        .from(Response::Table, Response::McqOptionId)
                        .to(McqOption::Table, McqOption::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_response_submission_question")
                .table(Response::Table)
                .col(Response::SubmissionId)
                .col(Response::QuestionId)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_response_question_id")
                .table(Response::Table)
                .col(Response::QuestionId)
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[derive(DeriveIden)]
enum School {
    Table,
    Id,
    Name,
    Code,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Department {
    Table,
    Id,
    SchoolId,
    Name,
    Code,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
    DepartmentId,
    Name,
    Code,
    Semester,
    Year,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    RollNumber,
    Name,
    SchoolId,
    DepartmentId,
    IsActive,
    IsStaff,
    JoinedAt,
}

#[derive(DeriveIden)]
enum StudentCourse {
    Table,
    Id,
    StudentId,
    CourseId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Teacher {
    Table,
    Id,
    Name,
    Email,
    EmployeeId,
    DepartmentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FormTemplate {
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TemplateQuestion {
    Table,
    Id,
    TemplateId,
    QuestionText,
    QuestionType,
    DisplayOrder,
    IsRequired,
}

#[derive(DeriveIden)]
enum TemplateOption {
    Table,
    Id,
    QuestionId,
    OptionText,
    DisplayOrder,
}

#[derive(DeriveIden)]
enum FeedbackForm {
    Table,
    Id,
    CourseId,
    TeacherId,
    Title,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    FormId,
    QuestionText,
    QuestionType,
    DisplayOrder,
    IsRequired,
}

#[derive(DeriveIden)]
enum McqOption {
    Table,
    Id,
    QuestionId,
    OptionText,
    DisplayOrder,
}

#[derive(DeriveIden)]
enum FormAllocation {
    Table,
    Id,
    TemplateId,
    TeacherId,
    CourseId,
    IsActive,
    AllocatedAt,
    FeedbackFormId,
}

#[derive(DeriveIden)]
enum FormSubmission {
    Table,
    Id,
    FormId,
    StudentId,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Response {
    Table,
    Id,
    SubmissionId,
    QuestionId,
    McqOptionId,
    TextAnswer,
}
