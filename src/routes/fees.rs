use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::UpdateFeeConfigsRequest;
use crate::models::users::entities::UserRole;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_fee_configs(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fee_configs(&req).await
}

pub async fn update_fee_configs(
    req: HttpRequest,
    update: web::Json<UpdateFeeConfigsRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_fee_configs(update.into_inner(), &req)
        .await
}

pub async fn pay_fee(req: HttpRequest, fee_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.pay_fee(fee_id.0, &req).await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/configs")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(list_fee_configs))
                    .route(web::put().to(update_fee_configs)),
            )
            .service(
                web::resource("/{id}/pay")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(pay_fee)),
            ),
    );
}
