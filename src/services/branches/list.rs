use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::BranchService;
use crate::models::branches::responses::BranchListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_branches(
    service: &BranchService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_branches().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BranchListResponse { items },
            "Branch list retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list branches: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve branch list",
                )),
            )
        }
    }
}
