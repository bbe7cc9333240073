use serde::Serialize;
use ts_rs::TS;

use crate::grading::{BeltInfo, BeltLevel};

// 腰带目录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/belt.ts")]
pub struct BeltCatalogResponse {
    pub items: Vec<BeltInfo>,
}

// 某腰带可晋升的目标
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/belt.ts")]
pub struct PromotionOptionsResponse {
    pub from_belt: BeltLevel,
    pub options: Vec<BeltLevel>,
}
