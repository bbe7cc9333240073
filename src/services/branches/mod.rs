pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::branches::requests::{CreateBranchRequest, UpdateBranchRequest};
use crate::storage::Storage;

// 分馆名称最大长度
pub(crate) const BRANCH_NAME_MAX: usize = 100;

pub struct BranchService {
    storage: Option<Arc<dyn Storage>>,
}

impl BranchService {
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

    pub async fn list_branches(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_branches(self, request).await
    }

    pub async fn create_branch(
        &self,
        branch_data: CreateBranchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_branch(self, branch_data, request).await
    }

    pub async fn update_branch(
        &self,
        branch_id: i64,
        update_data: UpdateBranchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_branch(self, branch_id, update_data, request).await
    }
}
