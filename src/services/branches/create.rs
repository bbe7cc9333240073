use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{BRANCH_NAME_MAX, BranchService};
use crate::models::branches::requests::CreateBranchRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_contact, validate_required_text};

pub async fn create_branch(
    service: &BranchService,
    mut branch_data: CreateBranchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required_text(&branch_data.name, BRANCH_NAME_MAX) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!("Branch name: {msg}"),
        )));
    }
    if let Err(msg) = validate_contact(branch_data.email.as_deref(), branch_data.phone.as_deref())
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    branch_data.name = branch_data.name.trim().to_string();

    let storage = service.get_storage(request);

    match storage.get_branch_by_name(&branch_data.name).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::BranchAlreadyExists,
                format!("Branch '{}' already exists", branch_data.name),
            )));
        }
        Err(e) => {
            error!("Failed to check branch name: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to create branch",
                )),
            );
        }
    }

    match storage.create_branch(branch_data).await {
        Ok(branch) => {
            info!("Branch {} created: {}", branch.id, branch.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(branch, "Branch created")))
        }
        Err(e) => {
            error!("Failed to create branch: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to create branch",
                )),
            )
        }
    }
}
