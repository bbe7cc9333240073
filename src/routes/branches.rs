use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::branches::requests::{CreateBranchRequest, UpdateBranchRequest};
use crate::models::users::entities::UserRole;
use crate::services::BranchService;
use crate::utils::SafeIDI64;

static BRANCH_SERVICE: Lazy<BranchService> = Lazy::new(BranchService::new_lazy);

pub async fn list_branches(req: HttpRequest) -> ActixResult<HttpResponse> {
    BRANCH_SERVICE.list_branches(&req).await
}

pub async fn create_branch(
    req: HttpRequest,
    branch_data: web::Json<CreateBranchRequest>,
) -> ActixResult<HttpResponse> {
    BRANCH_SERVICE
        .create_branch(branch_data.into_inner(), &req)
        .await
}

pub async fn update_branch(
    req: HttpRequest,
    branch_id: SafeIDI64,
    update_data: web::Json<UpdateBranchRequest>,
) -> ActixResult<HttpResponse> {
    BRANCH_SERVICE
        .update_branch(branch_id.0, update_data.into_inner(), &req)
        .await
}

// 配置路由：查看对所有登录用户开放，修改仅限管理员
pub fn configure_branch_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/branches")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_branches))
                    .route(
                        web::post()
                            .to(create_branch)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::put().to(update_branch)),
            ),
    );
}
