pub mod configs;
pub mod list;
pub mod pay;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::fees::requests::{FeeListParams, UpdateFeeConfigsRequest};
use crate::storage::Storage;

pub struct FeeService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeeService {
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

    // 费用配置
    pub async fn list_fee_configs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        configs::list_fee_configs(self, request).await
    }

    pub async fn update_fee_configs(
        &self,
        update: UpdateFeeConfigsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        configs::update_fee_configs(self, update, request).await
    }

    // 学员费用
    pub async fn list_student_fees(
        &self,
        student_id: i64,
        query: FeeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_student_fees(self, student_id, query, request).await
    }

    // 登记缴费
    pub async fn pay_fee(&self, fee_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        pay::pay_fee(self, fee_id, request).await
    }
}
