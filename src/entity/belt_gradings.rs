//! 腰带考核记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "belt_gradings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub from_belt: String,
    pub to_belt: String,
    pub grading_date: String,
    pub created_by: i64,
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
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::fees::Entity")]
    Fees,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为业务模型
    ///
    pub fn into_grading(self) -> crate::models::gradings::entities::GradingRecord {
        use crate::models::gradings::entities::GradingRecord;

        GradingRecord {
            id: self.id,
            student_id: self.student_id,
            from_belt: super::stored_belt("belt_gradings", self.id, &self.from_belt),
            to_belt: super::stored_belt("belt_gradings", self.id, &self.to_belt),
            grading_date: self.grading_date,
            created_by: self.created_by,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::BeltLevel;

    fn row(from: &str, to: &str) -> Model {
        Model {
            id: 5,
            student_id: 1,
            from_belt: from.to_string(),
            to_belt: to.to_string(),
            grading_date: "2024-03-01".to_string(),
            created_by: 2,
            created_at: 0,
        }
    }

    #[test]
    fn test_into_grading_reads_stored_belts() {
        let record = row("Brown 3", "Brown 2").into_grading();
        assert_eq!(record.from_belt, BeltLevel::Brown3);
        assert_eq!(record.to_belt, BeltLevel::Brown2);

        let legacy = row("Grey", "Yellow").into_grading();
        assert_eq!(legacy.from_belt, BeltLevel::White);
        assert_eq!(legacy.to_belt, BeltLevel::Yellow);
    }
}
