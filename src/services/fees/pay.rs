use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::FeeService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn pay_fee(
    service: &FeeService,
    fee_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let paid = match storage.mark_fee_paid(fee_id).await {
        Ok(paid) => paid,
        Err(e) => {
            error!("Failed to mark fee {} as paid: {}", fee_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to record payment",
                )),
            );
        }
    };

    if let Some(fee) = paid {
        info!(
            "Fee {} for student {} paid ({})",
            fee.id,
            fee.student_id,
            fee.display_amount()
        );
        return Ok(HttpResponse::Ok().json(ApiResponse::success(fee, "Payment recorded")));
    }

    // 未更新：费用不存在或已不是待缴状态
    match storage.get_fee_by_id(fee_id).await {
        Ok(Some(fee)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::FeeNotPending,
            format!("Fee is already {}", fee.status),
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FeeNotFound,
            "Fee not found",
        ))),
        Err(e) => {
            error!("Failed to load fee {}: {}", fee_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to record payment",
                )),
            )
        }
    }
}
