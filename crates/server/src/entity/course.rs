use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub department_id: String,
    pub name: String,
    pub code: String,
    pub semester: i32,
    pub year: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Department,
    #[sea_orm(has_many = "super::feedback_form::Entity")]
    FeedbackForm,
    #[sea_orm(has_many = "super::student_course::Entity")]
    StudentCourse,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::feedback_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackForm.def()
    }
}

impl Related<super::student_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentCourse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
