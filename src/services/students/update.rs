use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{StudentService, validate_profile};
use crate::grading::promotion_options;
use crate::models::students::{requests::UpdateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    mut update_data: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_profile(
        update_data.full_name.as_deref(),
        update_data.email.as_deref(),
        update_data.phone.as_deref(),
        update_data.date_of_birth.as_deref(),
    ) {
        return Ok(response);
    }
    update_data.full_name = update_data.full_name.map(|name| name.trim().to_string());

    let storage = service.get_storage(request);

    if let Some(branch_id) = update_data.branch_id {
        match storage.get_branch_by_id(branch_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::BranchNotFound,
                    format!("Branch {branch_id} not found"),
                )));
            }
            Err(e) => {
                error!("Failed to load branch {}: {}", branch_id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Failed to update student",
                    )),
                );
            }
        }
    }

    match storage.update_student(student_id, update_data).await {
        Ok(Some(student)) => {
            let promotion_options = promotion_options(&student.current_belt);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse {
                    student,
                    promotion_options,
                },
                "Student updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => {
            error!("Failed to update student {}: {}", student_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to update student",
                )),
            )
        }
    }
}
