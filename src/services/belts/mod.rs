//! 腰带目录查询，数据全部来自内置序列，不访问存储

use actix_web::{HttpResponse, Result as ActixResult};

use crate::grading::{BeltLevel, promotion_options};
use crate::models::belts::responses::{BeltCatalogResponse, PromotionOptionsResponse};
use crate::models::{ApiResponse, ErrorCode};

pub struct BeltService;

impl BeltService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 按晋级顺序返回全部腰带
    pub async fn list_belts(&self) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            BeltCatalogResponse {
                items: BeltLevel::catalog(),
            },
            "Belt catalog retrieved successfully",
        )))
    }

    // 某腰带可晋升到的目标
    pub async fn list_promotions(&self, name: &str) -> ActixResult<HttpResponse> {
        match BeltLevel::parse(name.trim()) {
            Some(from_belt) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                PromotionOptionsResponse {
                    from_belt,
                    options: promotion_options(from_belt.name()),
                },
                "Promotion options retrieved successfully",
            ))),
            None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::BeltNotFound,
                format!("Unknown belt '{name}'"),
            ))),
        }
    }
}
