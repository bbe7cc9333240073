//! 费用存储操作

use super::SeaOrmStorage;
use crate::entity::fee_configs::{self, Entity as FeeConfigs};
use crate::entity::fees::{self, Entity as Fees};
use crate::errors::{DojoError, Result};
use crate::models::{
    fees::{
        entities::{Fee, FeeConfig, FeeStatus},
        requests::{FeeListQuery, UpsertFeeConfigRequest},
        responses::FeeListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 列出全部费用配置
    pub async fn list_fee_configs_impl(&self) -> Result<Vec<FeeConfig>> {
        let result = FeeConfigs::find()
            .order_by_asc(fee_configs::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询费用配置失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_fee_config()).collect())
    }

    /// 按（类型，腰带）写入费用配置，已存在则更新
    pub async fn upsert_fee_config_impl(&self, req: UpsertFeeConfigRequest) -> Result<FeeConfig> {
        let now = chrono::Utc::now().timestamp();
        let belt_level = req.belt_level.map(|b| b.name().to_string());

        let mut select =
            FeeConfigs::find().filter(fee_configs::Column::FeeType.eq(req.fee_type.to_string()));
        select = match belt_level {
            Some(ref belt) => select.filter(fee_configs::Column::BeltLevel.eq(belt.as_str())),
            None => select.filter(fee_configs::Column::BeltLevel.is_null()),
        };

        let existing = select
            .one(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询费用配置失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active: fee_configs::ActiveModel = model.into();
                active.amount = Set(req.amount);
                active.due_days = Set(req.due_days);
                active.updated_at = Set(now);
                active.update(&self.db).await
            }
            None => {
                fee_configs::ActiveModel {
                    fee_type: Set(req.fee_type.to_string()),
                    belt_level: Set(belt_level),
                    amount: Set(req.amount),
                    due_days: Set(req.due_days),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| DojoError::database_operation(format!("保存费用配置失败: {e}")))?;

        Ok(result.into_fee_config())
    }

    /// 分页列出费用（截止日期最新在前）
    pub async fn list_fees_with_pagination_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<FeeListResponse> {
        let mut select = Fees::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(fees::Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(fees::Column::Status.eq(status.to_string()));
        }
        if let Some(fee_type) = query.fee_type {
            select = select.filter(fees::Column::FeeType.eq(fee_type.to_string()));
        }

        let select = select
            .order_by_desc(fees::Column::DueDate)
            .order_by_desc(fees::Column::Id);
        let (rows, pagination) = self
            .fetch_page(select, query.page.unwrap_or(1), query.size.unwrap_or(20), "费用")
            .await?;

        Ok(FeeListResponse {
            items: rows.into_iter().map(|m| m.into_fee()).collect(),
            pagination,
        })
    }

    pub async fn get_fee_by_id_impl(&self, id: i64) -> Result<Option<Fee>> {
        let result = Fees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询费用失败: {e}")))?;

        Ok(result.map(|m| m.into_fee()))
    }

    /// 标记费用已缴
    ///
    /// 条件更新：只有 pending 状态会被修改，返回 None 表示费用不存在或已不是待缴
    pub async fn mark_fee_paid_impl(&self, id: i64) -> Result<Option<Fee>> {
        let now = chrono::Utc::now().timestamp();

        let result = Fees::update_many()
            .col_expr(
                fees::Column::Status,
                sea_orm::sea_query::Expr::value(FeeStatus::Paid.to_string()),
            )
            .col_expr(fees::Column::PaidAt, sea_orm::sea_query::Expr::value(now))
            .filter(fees::Column::Id.eq(id))
            .filter(fees::Column::Status.eq(FeeStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| DojoError::database_operation(format!("更新费用状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_fee_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::grading::BeltLevel;
    use crate::models::fees::{
        entities::{FeeStatus, FeeType},
        requests::UpsertFeeConfigRequest,
    };

    #[tokio::test]
    async fn test_seeded_configs() {
        let storage = memory_storage().await;
        let configs = storage.list_fee_configs_impl().await.unwrap();
        assert_eq!(configs.len(), 10);

        let monthly = configs
            .iter()
            .find(|c| c.fee_type == FeeType::Monthly)
            .unwrap();
        assert_eq!(monthly.belt_level, None);
        assert_eq!(monthly.amount, 8000);

        // 白带是起点，没有考核费
        assert!(
            configs
                .iter()
                .all(|c| c.belt_level != Some(BeltLevel::White))
        );
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_row() {
        let storage = memory_storage().await;
        let updated = storage
            .upsert_fee_config_impl(UpsertFeeConfigRequest {
                fee_type: FeeType::Grading,
                belt_level: Some(BeltLevel::Black),
                amount: 15000,
                due_days: 21,
            })
            .await
            .unwrap();
        assert_eq!(updated.amount, 15000);
        assert_eq!(updated.due_days, 21);
        assert_eq!(storage.list_fee_configs_impl().await.unwrap().len(), 10);

        let monthly = storage
            .upsert_fee_config_impl(UpsertFeeConfigRequest {
                fee_type: FeeType::Monthly,
                belt_level: None,
                amount: 9000,
                due_days: 7,
            })
            .await
            .unwrap();
        assert_eq!(monthly.amount, 9000);
        assert_eq!(storage.list_fee_configs_impl().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_mark_paid_only_once() {
        use super::super::test_support::{seed_student, seed_user};
        use crate::models::gradings::requests::CreateGradingRequest;
        use crate::models::users::entities::UserRole;

        let storage = memory_storage().await;
        let user = seed_user(&storage, "sensei", UserRole::Instructor).await;
        let student = seed_student(&storage, "Aiko Tanaka", None).await;
        let outcome = storage
            .record_belt_grading_impl(
                CreateGradingRequest {
                    student_id: student.id,
                    from_belt: BeltLevel::White,
                    to_belt: BeltLevel::Yellow,
                    grading_date: "2024-03-01".to_string(),
                    created_by: user.id,
                },
                14,
            )
            .await
            .unwrap();

        let paid = storage
            .mark_fee_paid_impl(outcome.fee.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paid.status, FeeStatus::Paid);
        assert!(paid.paid_at.is_some());

        assert!(storage.mark_fee_paid_impl(outcome.fee.id).await.unwrap().is_none());
        assert!(storage.mark_fee_paid_impl(9999).await.unwrap().is_none());
    }
}
