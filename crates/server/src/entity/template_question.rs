use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "template_question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub template_id: String,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: String,
    pub display_order: i32,
    pub is_required: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::form_template::Entity",
        from = "Column::TemplateId",
        to = "super::form_template::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    FormTemplate,
    #[sea_orm(has_many = "super::template_option::Entity")]
    TemplateOption,
}

impl Related<super::form_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormTemplate.def()
    }
}

impl Related<super::template_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
