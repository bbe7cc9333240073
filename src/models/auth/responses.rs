use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 用户响应模型
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    // 客户端按角色进入的首页
    pub home_route: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}
