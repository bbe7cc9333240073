//! 业务数据模型
//!
//! 按资源划分：`entities` 为业务实体，`requests` 为请求参数，`responses` 为响应结构。

pub mod auth;
pub mod belts;
pub mod branches;
pub mod common;
pub mod fees;
pub mod gradings;
pub mod notifications;
pub mod students;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与授权
    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserPhoneInvalid = 3005,
    UserCreationFailed = 3006,

    // 分馆
    BranchNotFound = 4000,
    BranchAlreadyExists = 4001,

    // 学员
    StudentNotFound = 5000,
    StudentInvalid = 5001,

    // 腰带与考核
    BeltNotFound = 6000,
    GradingValidationFailed = 6001,
    GradingFeeConfigMissing = 6002,
    GradingRecordFailed = 6003,
    GradingTimeout = 6004,

    // 费用
    FeeNotFound = 7000,
    FeeNotPending = 7001,
    FeeConfigInvalid = 7002,

    // 通知
    NotificationNotFound = 8000,
}
