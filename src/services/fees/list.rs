use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FeeService;
use crate::models::fees::requests::{FeeListParams, FeeListQuery};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_student_fees(
    service: &FeeService,
    student_id: i64,
    query: FeeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            error!("Failed to load student {}: {}", student_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve fees",
                )),
            );
        }
    }

    let list_query = FeeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: Some(student_id),
        status: query.status,
        fee_type: query.fee_type,
    };

    match storage.list_fees_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Fees retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list fees for student {}: {}", student_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve fees",
                )),
            )
        }
    }
}
