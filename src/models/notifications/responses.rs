use serde::Serialize;
use ts_rs::TS;

use super::entities::Notification;
use crate::models::common::pagination::PaginationInfo;

/// 通知列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/notification.ts")]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub pagination: PaginationInfo,
}

/// 未读通知数量响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/notification.ts")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}
