use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::GradingService;
use crate::models::gradings::requests::GradingListParams;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_gradings(
    service: &GradingService,
    student_id: i64,
    query: GradingListParams,
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
                    "Failed to retrieve grading history",
                )),
            );
        }
    }

    match storage
        .list_student_gradings(student_id, query.pagination.page, query.pagination.size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grading history retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list gradings for student {}: {}", student_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve grading history",
                )),
            )
        }
    }
}
