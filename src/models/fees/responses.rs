use serde::Serialize;
use ts_rs::TS;

use super::entities::{Fee, FeeConfig};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct FeeConfigListResponse {
    pub items: Vec<FeeConfig>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/fee.ts")]
pub struct FeeListResponse {
    pub items: Vec<Fee>,
    pub pagination: PaginationInfo,
}
