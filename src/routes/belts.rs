use actix_web::{HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::BeltService;

static BELT_SERVICE: Lazy<BeltService> = Lazy::new(BeltService::new_lazy);

pub async fn list_belts() -> ActixResult<HttpResponse> {
    BELT_SERVICE.list_belts().await
}

pub async fn list_promotions(name: web::Path<String>) -> ActixResult<HttpResponse> {
    BELT_SERVICE.list_promotions(&name).await
}

// 配置路由
pub fn configure_belt_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/belts")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_belts))
            .route("/{name}/promotions", web::get().to(list_promotions)),
    );
}
