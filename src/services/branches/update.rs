use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{BRANCH_NAME_MAX, BranchService};
use crate::models::branches::requests::UpdateBranchRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_contact, validate_required_text};

pub async fn update_branch(
    service: &BranchService,
    branch_id: i64,
    mut update_data: UpdateBranchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = update_data.name.as_deref() {
        if let Err(msg) = validate_required_text(name, BRANCH_NAME_MAX) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                format!("Branch name: {msg}"),
            )));
        }
        update_data.name = Some(name.trim().to_string());
    }
    if let Err(msg) = validate_contact(update_data.email.as_deref(), update_data.phone.as_deref())
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    // 改名时不得与其他分馆重名
    if let Some(name) = update_data.name.as_deref() {
        match storage.get_branch_by_name(name).await {
            Ok(Some(existing)) if existing.id != branch_id => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::BranchAlreadyExists,
                    format!("Branch '{name}' already exists"),
                )));
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to check branch name: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Failed to update branch",
                    )),
                );
            }
        }
    }

    match storage.update_branch(branch_id, update_data).await {
        Ok(Some(branch)) => Ok(HttpResponse::Ok().json(ApiResponse::success(branch, "Branch updated"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::BranchNotFound,
            "Branch not found",
        ))),
        Err(e) => {
            error!("Failed to update branch {}: {}", branch_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to update branch",
                )),
            )
        }
    }
}
