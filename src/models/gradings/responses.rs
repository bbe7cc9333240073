use serde::Serialize;
use ts_rs::TS;

use super::entities::GradingRecord;
use crate::models::common::PaginationInfo;
use crate::models::fees::entities::Fee;

// 录入考核成功响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct RecordGradingResponse {
    pub grading: GradingRecord,
    pub fee: Fee,
    // 客户端在此毫秒数后返回学员列表
    pub navigate_after_ms: i64,
    pub redirect_to: String,
}

// 考核历史响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct GradingListResponse {
    pub items: Vec<GradingRecord>,
    pub pagination: PaginationInfo,
}
