//! 费用配置实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_type: String,
    pub belt_level: Option<String>,
    pub amount: i64,
    pub due_days: i32,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee_config(self) -> crate::models::fees::entities::FeeConfig {
        use crate::models::fees::entities::{FeeConfig, FeeType};

        FeeConfig {
            id: self.id,
            fee_type: self.fee_type.parse::<FeeType>().unwrap_or(FeeType::Monthly),
            belt_level: super::stored_optional_belt("fee_configs", self.id, self.belt_level.as_deref()),
            amount: self.amount,
            due_days: self.due_days,
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
