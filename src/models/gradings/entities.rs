use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grading::BeltLevel;
use crate::models::fees::entities::Fee;

// 腰带考核记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct GradingRecord {
    pub id: i64,
    pub student_id: i64,
    pub from_belt: BeltLevel,
    pub to_belt: BeltLevel,
    // 考核日期 YYYY-MM-DD
    pub grading_date: String,
    // 录入考核的用户
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 一次考核事务的完整产出
#[derive(Debug, Clone)]
pub struct GradingOutcome {
    pub grading: GradingRecord,
    pub fee: Fee,
    /// 学员关联的登录账号，用于发送通知
    pub student_user_id: Option<i64>,
}
