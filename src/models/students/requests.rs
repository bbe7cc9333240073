use serde::Deserialize;
use ts_rs::TS;

use super::entities::StudentStatus;
use crate::grading::BeltLevel;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_string_to_i64;

// 学员查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    #[ts(type = "number | null")]
    pub branch_id: Option<i64>,
    pub belt: Option<BeltLevel>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

// 创建学员请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub branch_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    // 不填写则从白带开始
    pub current_belt: Option<BeltLevel>,
    pub joined_at: Option<String>,
}

// 更新学员请求
//
// 腰带只能通过考核变更，因此这里没有 current_belt
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub branch_id: Option<i64>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub status: Option<StudentStatus>,
}

// 学员列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub branch_id: Option<i64>,
    pub belt: Option<BeltLevel>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}
