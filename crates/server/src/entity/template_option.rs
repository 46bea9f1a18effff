use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "template_option")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub question_id: String,
    pub option_text: String,
    pub display_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::template_question::Entity",
        from = "Column::QuestionId",
        to = "super::template_question::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TemplateQuestion,
}

impl Related<super::template_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
