pub mod list;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::gradings::requests::{GradingListParams, RecordGradingRequest};
use crate::storage::Storage;

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradingService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 录入升级考核
    pub async fn record_grading(
        &self,
        student_id: i64,
        body: RecordGradingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_grading(self, student_id, body, request).await
    }

    // 学员考核历史
    pub async fn list_gradings(
        &self,
        student_id: i64,
        query: GradingListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_gradings(self, student_id, query, request).await
    }
}
