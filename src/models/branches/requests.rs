use serde::Deserialize;
use ts_rs::TS;

// 创建分馆请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/branch.ts")]
pub struct CreateBranchRequest {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// 更新分馆请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/branch.ts")]
pub struct UpdateBranchRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
