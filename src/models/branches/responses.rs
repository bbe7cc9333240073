use serde::Serialize;
use ts_rs::TS;

use super::entities::Branch;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/branch.ts")]
pub struct BranchListResponse {
    pub items: Vec<Branch>,
}
