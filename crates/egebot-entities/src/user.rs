use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: chrono::NaiveDateTime,

    #[sea_orm(unique)]
    pub telegram_id: i64,
    #[sea_orm(not_null)]
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exam_score::Entity")]
    ExamScores,
}

impl Related<super::exam_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
