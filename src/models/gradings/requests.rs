use serde::Deserialize;
use ts_rs::TS;

use crate::grading::BeltLevel;
use crate::models::common::PaginationQuery;

// 录入考核请求（来自HTTP请求）
//
// 字段为 camelCase，录入人取自当前登录用户
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct RecordGradingRequest {
    pub from_belt: Option<String>,
    pub to_belt: Option<String>,
    pub grading_date: Option<String>,
}

// 考核写入参数（用于存储层，已通过比较器校验）
#[derive(Debug, Clone)]
pub struct CreateGradingRequest {
    pub student_id: i64,
    pub from_belt: BeltLevel,
    pub to_belt: BeltLevel,
    pub grading_date: String,
    pub created_by: i64,
}

// 考核历史查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/grading.ts")]
pub struct GradingListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
