pub mod count;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::notifications::requests::NotificationListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 只操作当前用户自己的通知
    fn current_user_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
        RequireJWT::extract_user_id(request).ok_or_else(|| {
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            ))
        })
    }

    pub async fn list_notifications(
        &self,
        query: NotificationListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        match Self::current_user_id(request) {
            Ok(user_id) => list::list_notifications(self, user_id, query, request).await,
            Err(response) => Ok(response),
        }
    }

    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        match Self::current_user_id(request) {
            Ok(user_id) => count::get_unread_count(self, request, user_id).await,
            Err(response) => Ok(response),
        }
    }

    pub async fn mark_as_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        match Self::current_user_id(request) {
            Ok(user_id) => read::mark_as_read(self, user_id, notification_id, request).await,
            Err(response) => Ok(response),
        }
    }
}
