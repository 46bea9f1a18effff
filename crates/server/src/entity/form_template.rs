use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "form_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::template_question::Entity")]
    TemplateQuestion,
    #[sea_orm(has_many = "super::form_allocation::Entity")]
    FormAllocation,
}

impl Related<super::template_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateQuestion.def()
    }
}

impl Related<super::form_allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormAllocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
