use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{StudentService, validate_profile};
use crate::grading::promotion_options;
use crate::models::students::{requests::CreateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_date;

pub async fn create_student(
    service: &StudentService,
    mut student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_profile(
        Some(&student_data.full_name),
        student_data.email.as_deref(),
        student_data.phone.as_deref(),
        student_data.date_of_birth.as_deref(),
    ) {
        return Ok(response);
    }
    if let Some(joined_at) = student_data.joined_at.as_deref()
        && let Err(msg) = validate_date(joined_at)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::StudentInvalid,
            format!("Joined date: {msg}"),
        )));
    }
    student_data.full_name = student_data.full_name.trim().to_string();

    let storage = service.get_storage(request);

    match storage.get_branch_by_id(student_data.branch_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::BranchNotFound,
                format!("Branch {} not found", student_data.branch_id),
            )));
        }
        Err(e) => {
            error!("Failed to load branch {}: {}", student_data.branch_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to create student",
                )),
            );
        }
    }

    // 关联的登录账号必须存在
    if let Some(user_id) = student_data.user_id {
        match storage.get_user_by_id(user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    format!("User {user_id} not found"),
                )));
            }
            Err(e) => {
                error!("Failed to load user {}: {}", user_id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Failed to create student",
                    )),
                );
            }
        }
    }

    match storage.create_student(student_data).await {
        Ok(student) => {
            info!(
                "Student {} created in branch {} at {}",
                student.id, student.branch_id, student.current_belt
            );
            let promotion_options = promotion_options(&student.current_belt);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse {
                    student,
                    promotion_options,
                },
                "Student created",
            )))
        }
        Err(e) => {
            error!("Failed to create student: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to create student",
                )),
            )
        }
    }
}
