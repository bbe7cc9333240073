use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::NotificationService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn mark_as_read(
    service: &NotificationService,
    user_id: i64,
    notification_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 他人的通知按不存在处理
    match storage.get_notification_by_id(notification_id).await {
        Ok(Some(notification)) if notification.user_id == user_id => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotificationNotFound,
                "Notification not found",
            )));
        }
        Err(e) => {
            error!("Failed to load notification {}: {}", notification_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to update notification",
                )),
            );
        }
    }

    match storage.mark_notification_as_read(notification_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Notification marked as read",
        ))),
        Err(e) => {
            error!("Failed to mark notification {} as read: {}", notification_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to update notification",
                )),
            )
        }
    }
}
