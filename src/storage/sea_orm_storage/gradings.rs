//! 腰带考核存储操作

use super::SeaOrmStorage;
use crate::entity::belt_gradings::{self, Entity as BeltGradings};
use crate::entity::fee_configs::{self, Entity as FeeConfigs};
use crate::entity::{fees, students::{self, Entity as Students}};
use crate::errors::{DojoError, Result};
use crate::grading::{form::GRADING_DATE_FORMAT, is_higher};
use crate::models::{
    fees::entities::{FeeStatus, FeeType},
    gradings::{
        entities::GradingOutcome, requests::CreateGradingRequest,
        responses::GradingListResponse,
    },
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 记录一次腰带考核
    ///
    /// 考核记录、学员腰带和考核费用在同一事务中写入；
    /// 任一步失败（学员不存在、缺少费用配置等）整体回滚。
    pub async fn record_belt_grading_impl(
        &self,
        req: CreateGradingRequest,
        default_due_days: i64,
    ) -> Result<GradingOutcome> {
        let grading_date = NaiveDate::parse_from_str(&req.grading_date, GRADING_DATE_FORMAT)?;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DojoError::database_operation(format!("开启事务失败: {e}")))?;

        let student = Students::find_by_id(req.student_id)
            .one(&txn)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询学员失败: {e}")))?
            .ok_or_else(|| DojoError::not_found(format!("Student {} not found", req.student_id)))?;

        // 以库中的当前腰带为准：过期或重复的提交不能降级，也不能重复计费
        if !is_higher(req.to_belt.name(), &student.current_belt) {
            return Err(DojoError::validation(format!(
                "{} is not a promotion for a student who already holds {}",
                req.to_belt, student.current_belt
            )));
        }

        // 条件更新：并发提交中只有先到的一次能改动腰带
        let updated = Students::update_many()
            .col_expr(students::Column::CurrentBelt, Expr::value(req.to_belt.name()))
            .col_expr(students::Column::UpdatedAt, Expr::value(now))
            .filter(students::Column::Id.eq(student.id))
            .filter(students::Column::CurrentBelt.eq(student.current_belt.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| DojoError::database_operation(format!("更新学员腰带失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(DojoError::validation(format!(
                "The belt of student {} changed while recording, reload and try again",
                student.id
            )));
        }

        let grading = belt_gradings::ActiveModel {
            student_id: Set(req.student_id),
            from_belt: Set(req.from_belt.name().to_string()),
            to_belt: Set(req.to_belt.name().to_string()),
            grading_date: Set(req.grading_date.clone()),
            created_by: Set(req.created_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| DojoError::database_operation(format!("写入考核记录失败: {e}")))?;

        let config = FeeConfigs::find()
            .filter(fee_configs::Column::FeeType.eq(FeeType::GRADING))
            .filter(fee_configs::Column::BeltLevel.eq(req.to_belt.name()))
            .one(&txn)
            .await
            .map_err(|e| DojoError::database_operation(format!("查询费用配置失败: {e}")))?
            .ok_or_else(|| {
                DojoError::grading(format!(
                    "No grading fee is configured for {}, ask an administrator to set one",
                    req.to_belt
                ))
            })?;

        let due_days = if config.due_days > 0 {
            i64::from(config.due_days)
        } else {
            default_due_days
        };
        let due_date = grading_date + chrono::Duration::days(due_days);

        let fee = fees::ActiveModel {
            student_id: Set(req.student_id),
            fee_type: Set(FeeType::Grading.to_string()),
            amount: Set(config.amount),
            belt_level: Set(Some(req.to_belt.name().to_string())),
            grading_id: Set(Some(grading.id)),
            due_date: Set(due_date.format(GRADING_DATE_FORMAT).to_string()),
            status: Set(FeeStatus::Pending.to_string()),
            paid_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| DojoError::database_operation(format!("生成考核费用失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| DojoError::database_operation(format!("提交考核事务失败: {e}")))?;

        debug!(
            "Grading transaction committed: grading={}, fee={}",
            grading.id, fee.id
        );

        Ok(GradingOutcome {
            grading: grading.into_grading(),
            fee: fee.into_fee(),
            student_user_id: student.user_id,
        })
    }

    /// 学员考核历史（最新在前）
    pub async fn list_student_gradings_impl(
        &self,
        student_id: i64,
        page: i64,
        size: i64,
    ) -> Result<GradingListResponse> {
        let select = BeltGradings::find()
            .filter(belt_gradings::Column::StudentId.eq(student_id))
            .order_by_desc(belt_gradings::Column::GradingDate)
            .order_by_desc(belt_gradings::Column::Id);
        let (rows, pagination) = self.fetch_page(select, page, size, "考核记录").await?;

        Ok(GradingListResponse {
            items: rows.into_iter().map(|m| m.into_grading()).collect(),
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student, seed_user};
    use crate::entity::fee_configs::{Column, Entity as FeeConfigs};
    use crate::errors::DojoError;
    use crate::grading::BeltLevel;
    use crate::models::fees::{
        entities::{FeeStatus, FeeType},
        requests::FeeListQuery,
    };
    use crate::models::gradings::requests::CreateGradingRequest;
    use crate::models::users::entities::UserRole;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    fn grading(student_id: i64, from: BeltLevel, to: BeltLevel, date: &str) -> CreateGradingRequest {
        CreateGradingRequest {
            student_id,
            from_belt: from,
            to_belt: to,
            grading_date: date.to_string(),
            created_by: 1,
        }
    }

    #[tokio::test]
    async fn test_records_grading_updates_belt_and_creates_fee() {
        let storage = memory_storage().await;
        seed_user(&storage, "sensei", UserRole::Instructor).await;
        let student = seed_student(&storage, "Aiko Tanaka", None).await;

        let outcome = storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::White, BeltLevel::Yellow, "2024-03-01"),
                14,
            )
            .await
            .unwrap();

        assert_eq!(outcome.grading.to_belt, BeltLevel::Yellow);
        assert_eq!(outcome.fee.fee_type, FeeType::Grading);
        assert_eq!(outcome.fee.status, FeeStatus::Pending);
        assert_eq!(outcome.fee.amount, 3000);
        assert_eq!(outcome.fee.grading_id, Some(outcome.grading.id));
        assert_eq!(outcome.fee.due_date, "2024-03-15");
        assert_eq!(outcome.student_user_id, None);

        let student = storage
            .get_student_by_id_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.current_belt, "Yellow");

        let fees = storage
            .list_fees_with_pagination_impl(FeeListQuery {
                page: None,
                size: None,
                student_id: Some(student.id),
                status: None,
                fee_type: None,
            })
            .await
            .unwrap();
        assert_eq!(fees.items.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fee_config_rolls_back() {
        let storage = memory_storage().await;
        seed_user(&storage, "sensei", UserRole::Instructor).await;
        let student = seed_student(&storage, "Aiko Tanaka", None).await;

        FeeConfigs::delete_many()
            .filter(Column::BeltLevel.eq("Orange"))
            .exec(&storage.db)
            .await
            .unwrap();

        let err = storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::White, BeltLevel::Orange, "2024-03-01"),
                14,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DojoError::Grading(_)));

        let student = storage
            .get_student_by_id_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.current_belt, "White");

        let history = storage
            .list_student_gradings_impl(student.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(history.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_unknown_student_is_not_found() {
        let storage = memory_storage().await;
        let err = storage
            .record_belt_grading_impl(
                grading(404, BeltLevel::White, BeltLevel::Yellow, "2024-03-01"),
                14,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DojoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stale_or_repeated_submission_is_rejected() {
        let storage = memory_storage().await;
        seed_user(&storage, "sensei", UserRole::Instructor).await;
        let student = seed_student(&storage, "Aiko Tanaka", None).await;

        storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::White, BeltLevel::Black, "2024-03-01"),
                14,
            )
            .await
            .unwrap();

        // 学员已是黑带，旧表单上的 Yellow → Orange 不能把他降级
        let err = storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::Yellow, BeltLevel::Orange, "2024-03-02"),
                14,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DojoError::Validation(_)));

        // 同一次晋级重复提交
        let err = storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::White, BeltLevel::Black, "2024-03-01"),
                14,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DojoError::Validation(_)));

        let student = storage
            .get_student_by_id_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.current_belt, "Black");

        let history = storage
            .list_student_gradings_impl(student.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(history.pagination.total, 1);

        let fees = storage
            .list_fees_with_pagination_impl(FeeListQuery {
                page: None,
                size: None,
                student_id: Some(student.id),
                status: None,
                fee_type: None,
            })
            .await
            .unwrap();
        assert_eq!(fees.items.len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let storage = memory_storage().await;
        seed_user(&storage, "sensei", UserRole::Instructor).await;
        let student = seed_student(&storage, "Aiko Tanaka", None).await;

        storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::White, BeltLevel::Yellow, "2024-01-05"),
                14,
            )
            .await
            .unwrap();
        storage
            .record_belt_grading_impl(
                grading(student.id, BeltLevel::Yellow, BeltLevel::Green, "2024-06-20"),
                14,
            )
            .await
            .unwrap();

        let history = storage
            .list_student_gradings_impl(student.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(history.items.len(), 2);
        assert_eq!(history.items[0].to_belt, BeltLevel::Green);
        assert_eq!(history.items[1].to_belt, BeltLevel::Yellow);
    }
}
