use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "response")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub submission_id: String,
    pub question_id: String,
    pub mcq_option_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub text_answer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::form_submission::Entity",
        from = "Column::SubmissionId",
        to = "super::form_submission::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    FormSubmission,
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::mcq_option::Entity",
        from = "Column::McqOptionId",
        to = "super::mcq_option::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    McqOption,
}

impl Related<super::form_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormSubmission.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::mcq_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::McqOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
