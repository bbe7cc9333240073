//! 升级考核记录器
//!
//! 表单控制器只依赖 [`GradingRecorder`] 这一契约；
//! [`StorageGradingRecorder`] 在一个数据库事务中完成考核记录、腰带更新与考核费用生成。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use ts_rs::TS;

use super::belts::{BeltLevel, is_higher};
use crate::errors::DojoError;
use crate::models::fees::entities::Fee;
use crate::models::gradings::entities::GradingRecord;
use crate::models::gradings::requests::CreateGradingRequest;
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::storage::Storage;

/// 提交给记录器的考核请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct GradingSubmission {
    pub student_id: i64,
    pub from_belt: String,
    pub to_belt: String,
    /// ISO 日期 `YYYY-MM-DD`
    pub grading_date: String,
    pub created_by_id: i64,
}

/// 记录成功后的结果：考核记录和随之生成的考核费用
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct RecordedGrading {
    pub grading: GradingRecord,
    pub fee: Fee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderErrorKind {
    /// 学员不存在
    StudentNotFound,
    /// 目标腰带没有对应的考核费用配置
    FeeConfigMissing,
    /// 晋级关系不成立
    InvalidPromotion,
    /// 请求超时
    Timeout,
    /// 底层存储不可用
    Unavailable,
}

/// 记录器返回的结构化错误，`message` 原样展示给用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderError {
    pub kind: RecorderErrorKind,
    pub message: String,
}

impl RecorderError {
    pub fn new(kind: RecorderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            RecorderErrorKind::Timeout,
            format!(
                "Recording the grading timed out after {} ms, please try again",
                after.as_millis()
            ),
        )
    }
}

impl std::fmt::Display for RecorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RecorderError {}

impl From<DojoError> for RecorderError {
    fn from(err: DojoError) -> Self {
        let kind = match &err {
            DojoError::NotFound(_) => RecorderErrorKind::StudentNotFound,
            DojoError::Grading(_) => RecorderErrorKind::FeeConfigMissing,
            DojoError::Validation(_) | DojoError::DateParse(_) => {
                RecorderErrorKind::InvalidPromotion
            }
            _ => RecorderErrorKind::Unavailable,
        };
        RecorderError::new(kind, err.message())
    }
}

#[async_trait]
pub trait GradingRecorder: Send + Sync {
    /// 持久化一次考核：写入记录、更新学员腰带并生成一笔考核费用
    async fn record_grading(
        &self,
        submission: GradingSubmission,
    ) -> Result<RecordedGrading, RecorderError>;
}

/// 基于 [`Storage`] 的记录器实现
pub struct StorageGradingRecorder {
    storage: Arc<dyn Storage>,
    default_due_days: i64,
}

impl StorageGradingRecorder {
    pub fn new(storage: Arc<dyn Storage>, default_due_days: i64) -> Self {
        Self {
            storage,
            default_due_days,
        }
    }
}

// 考核已提交后通知学员，失败只记录日志
async fn notify_student(storage: Arc<dyn Storage>, user_id: i64, request: CreateNotificationRequest) {
    let grading_id = request.reference_id;
    if let Err(e) = storage.create_notification(request).await {
        warn!(
            "Failed to notify user {} about grading {:?}: {}",
            user_id, grading_id, e
        );
    }
}

fn grading_notification(user_id: i64, recorded: &RecordedGrading) -> CreateNotificationRequest {
    CreateNotificationRequest {
        user_id,
        notification_type: "grading_recorded".to_string(),
        title: format!("Promoted to {}", recorded.grading.to_belt),
        content: Some(format!(
            "Congratulations! Your grading from {} to {} on {} has been recorded. A grading fee of {} is due on {}.",
            recorded.grading.from_belt,
            recorded.grading.to_belt,
            recorded.grading.grading_date,
            recorded.fee.display_amount(),
            recorded.fee.due_date
        )),
        reference_type: Some("grading".to_string()),
        reference_id: Some(recorded.grading.id),
    }
}

#[async_trait]
impl GradingRecorder for StorageGradingRecorder {
    async fn record_grading(
        &self,
        submission: GradingSubmission,
    ) -> Result<RecordedGrading, RecorderError> {
        // 客户端已校验，这里仍以比较器为准
        let (from_belt, to_belt) = match (
            BeltLevel::parse(&submission.from_belt),
            BeltLevel::parse(&submission.to_belt),
        ) {
            (Some(from), Some(to)) if is_higher(to.name(), from.name()) => (from, to),
            _ => {
                return Err(RecorderError::new(
                    RecorderErrorKind::InvalidPromotion,
                    format!(
                        "{} is not a promotion from {}",
                        submission.to_belt, submission.from_belt
                    ),
                ));
            }
        };

        let request = CreateGradingRequest {
            student_id: submission.student_id,
            from_belt,
            to_belt,
            grading_date: submission.grading_date,
            created_by: submission.created_by_id,
        };

        let outcome = self
            .storage
            .record_belt_grading(request, self.default_due_days)
            .await?;

        info!(
            "Grading {} recorded: student {} {} -> {}, fee {} created",
            outcome.grading.id,
            outcome.grading.student_id,
            outcome.grading.from_belt,
            outcome.grading.to_belt,
            outcome.fee.id
        );

        let recorded = RecordedGrading {
            grading: outcome.grading,
            fee: outcome.fee,
        };

        // 事务已提交，通知放到后台，调用方的超时只覆盖到提交为止
        if let Some(user_id) = outcome.student_user_id {
            tokio::spawn(notify_student(
                self.storage.clone(),
                user_id,
                grading_notification(user_id, &recorded),
            ));
        }

        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_student, seed_user};
    use std::time::Duration;

    #[test]
    fn test_error_kind_mapping() {
        let err: RecorderError = DojoError::not_found("Student 7 not found").into();
        assert_eq!(err.kind, RecorderErrorKind::StudentNotFound);
        assert_eq!(err.message, "Student 7 not found");

        let err: RecorderError = DojoError::grading("No grading fee configured").into();
        assert_eq!(err.kind, RecorderErrorKind::FeeConfigMissing);

        let err: RecorderError = DojoError::database_operation("disk full").into();
        assert_eq!(err.kind, RecorderErrorKind::Unavailable);
    }

    #[test]
    fn test_submission_wire_format() {
        let submission = GradingSubmission {
            student_id: 3,
            from_belt: "Yellow".to_string(),
            to_belt: "Orange".to_string(),
            grading_date: "2024-03-01".to_string(),
            created_by_id: 9,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["studentId"], 3);
        assert_eq!(json["fromBelt"], "Yellow");
        assert_eq!(json["toBelt"], "Orange");
        assert_eq!(json["gradingDate"], "2024-03-01");
        assert_eq!(json["createdById"], 9);
    }

    #[test]
    fn test_timeout_message() {
        let err = RecorderError::timeout(std::time::Duration::from_millis(1500));
        assert_eq!(err.kind, RecorderErrorKind::Timeout);
        assert!(err.message.contains("1500 ms"));
    }

    #[tokio::test]
    async fn test_linked_student_is_notified_after_commit() {
        let storage = memory_storage().await;
        let coach = seed_user(&storage, "sensei", UserRole::Instructor).await;
        let account = seed_user(&storage, "aiko", UserRole::Student).await;
        let student = seed_student(&storage, "Aiko Tanaka", Some(account.id)).await;

        let storage: Arc<dyn Storage> = Arc::new(storage);
        let recorder = StorageGradingRecorder::new(storage.clone(), 14);
        let recorded = recorder
            .record_grading(GradingSubmission {
                student_id: student.id,
                from_belt: "White".to_string(),
                to_belt: "Yellow".to_string(),
                grading_date: "2024-03-01".to_string(),
                created_by_id: coach.id,
            })
            .await
            .unwrap();
        assert_eq!(recorded.grading.to_belt, BeltLevel::Yellow);

        let mut unread = 0;
        for _ in 0..50 {
            unread = storage
                .get_unread_notification_count(account.id)
                .await
                .unwrap();
            if unread > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(unread, 1);
    }
}
