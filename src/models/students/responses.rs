use serde::Serialize;
use ts_rs::TS;

use super::entities::Student;
use crate::grading::BeltLevel;
use crate::models::common::PaginationInfo;

// 学员详情响应，附带可晋升的腰带
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub struct StudentResponse {
    pub student: Student,
    pub promotion_options: Vec<BeltLevel>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}
