use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::FeeService;
use crate::grading::BeltLevel;
use crate::models::fees::{
    entities::FeeType,
    requests::{UpdateFeeConfigsRequest, UpsertFeeConfigRequest},
    responses::FeeConfigListResponse,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_fee_configs(
    service: &FeeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_fee_configs().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeeConfigListResponse { items },
            "Fee configuration retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list fee configs: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve fee configuration",
                )),
            )
        }
    }
}

pub async fn update_fee_configs(
    service: &FeeService,
    update: UpdateFeeConfigsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 全部校验通过后再写入
    for config in &update.configs {
        if let Err(msg) = validate_fee_config(config) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::FeeConfigInvalid, msg)));
        }
    }

    let storage = service.get_storage(request);

    let mut items = Vec::with_capacity(update.configs.len());
    for config in update.configs {
        match storage.upsert_fee_config(config).await {
            Ok(saved) => items.push(saved),
            Err(e) => {
                error!("Failed to save fee config: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Failed to save fee configuration",
                    )),
                );
            }
        }
    }

    info!("{} fee configuration entries updated", items.len());

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FeeConfigListResponse { items },
        "Fee configuration updated",
    )))
}

fn validate_fee_config(config: &UpsertFeeConfigRequest) -> Result<(), String> {
    if config.amount < 0 {
        return Err("Amount must not be negative".to_string());
    }
    if config.due_days < 0 {
        return Err("Due days must not be negative".to_string());
    }
    match (config.fee_type, config.belt_level) {
        (FeeType::Monthly, None) => Ok(()),
        (FeeType::Monthly, Some(_)) => {
            Err("Monthly fees apply to every belt, belt_level must be empty".to_string())
        }
        (FeeType::Grading, None) => {
            Err("Grading fees require the destination belt_level".to_string())
        }
        // 没有晋级到白带的考核
        (FeeType::Grading, Some(BeltLevel::White)) => {
            Err("No grading leads to White, it cannot carry a grading fee".to_string())
        }
        (FeeType::Grading, Some(_)) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(fee_type: FeeType, belt_level: Option<BeltLevel>, amount: i64) -> UpsertFeeConfigRequest {
        UpsertFeeConfigRequest {
            fee_type,
            belt_level,
            amount,
            due_days: 14,
        }
    }

    #[test]
    fn test_validate_fee_config() {
        assert!(validate_fee_config(&config(FeeType::Monthly, None, 8000)).is_ok());
        assert!(validate_fee_config(&config(FeeType::Grading, Some(BeltLevel::Blue), 3500)).is_ok());

        assert!(validate_fee_config(&config(FeeType::Monthly, Some(BeltLevel::Blue), 8000)).is_err());
        assert!(validate_fee_config(&config(FeeType::Grading, None, 3500)).is_err());
        assert!(validate_fee_config(&config(FeeType::Grading, Some(BeltLevel::White), 0)).is_err());
        assert!(validate_fee_config(&config(FeeType::Grading, Some(BeltLevel::Black), -1)).is_err());
    }
}
