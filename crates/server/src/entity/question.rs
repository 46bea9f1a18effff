use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub form_id: String,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: String,
    pub display_order: i32,
    pub is_required: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::feedback_form::Entity",
        from = "Column::FormId",
        to = "super::feedback_form::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    FeedbackForm,
    #[sea_orm(has_many = "super::mcq_option::Entity")]
    McqOption,
    #[sea_orm(has_many = "super::response::Entity")]
    Response,
}

impl Related<super::feedback_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackForm.def()
    }
}

impl Related<super::mcq_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::McqOption.def()
    }
}

impl Related<super::response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Response.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
