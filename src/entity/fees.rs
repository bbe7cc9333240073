//! 学员费用实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub fee_type: String,
    pub amount: i64,
    pub belt_level: Option<String>,
    pub grading_id: Option<i64>,
    pub due_date: String,
    pub status: String,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::belt_gradings::Entity",
        from = "Column::GradingId",
        to = "super::belt_gradings::Column::Id"
    )]
    Grading,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::belt_gradings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grading.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee(self) -> crate::models::fees::entities::Fee {
        use crate::models::fees::entities::{Fee, FeeStatus, FeeType};

        Fee {
            id: self.id,
            student_id: self.student_id,
            fee_type: self.fee_type.parse::<FeeType>().unwrap_or(FeeType::Monthly),
            amount: self.amount,
            belt_level: super::stored_optional_belt("fees", self.id, self.belt_level.as_deref()),
            grading_id: self.grading_id,
            due_date: self.due_date,
            status: self.status.parse::<FeeStatus>().unwrap_or(FeeStatus::Pending),
            paid_at: self.paid_at.map(super::timestamp_to_datetime),
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
