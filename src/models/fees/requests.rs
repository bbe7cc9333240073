use serde::Deserialize;
use ts_rs::TS;

use super::entities::{FeeStatus, FeeType};
use crate::grading::BeltLevel;
use crate::models::common::PaginationQuery;

// 费用配置更新项
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct UpsertFeeConfigRequest {
    pub fee_type: FeeType,
    pub belt_level: Option<BeltLevel>,
    pub amount: i64,
    pub due_days: i32,
}

// 批量更新费用配置
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct UpdateFeeConfigsRequest {
    pub configs: Vec<UpsertFeeConfigRequest>,
}

// 学员费用查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct FeeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<FeeStatus>,
    pub fee_type: Option<FeeType>,
}

// 费用列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct FeeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<FeeStatus>,
    pub fee_type: Option<FeeType>,
}
