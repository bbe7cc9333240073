/*!
 * 基于角色的访问控制中间件
 *
 * 依赖 RequireJWT 放入请求扩展的当前用户，必须包在 RequireJWT 里面：
 * actix 中后注册的 wrap 先执行，所以 RequireJWT 写在最后。
 *
 * ```rust,ignore
 * web::scope("/api/v1/students")
 *     .wrap(RequireRole::new_any(UserRole::staff_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Arc<[UserRole]>,
}

impl RequireRole {
    /// 用户角色属于 `roles` 之一即放行
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(&self, role: &UserRole) -> bool {
        self.allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            let current = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            let (status, code, message) = match current {
                Some((_, role)) if rule.permits(&role) => {
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} ({}) on {}, allowed: {:?}",
                        user_id,
                        role,
                        req.path(),
                        rule.allowed
                    );
                    (
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        "You do not have permission to perform this action",
                    )
                }
                None => {
                    info!("Role check on {} without an authenticated user", req.path());
                    (
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                }
            };

            Ok(req.into_response(create_error_response(status, code, message).map_into_right_body()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test::{TestRequest, call_service, init_service}, web};

    #[test]
    fn test_staff_roles() {
        let staff = RequireRole::new_any(UserRole::staff_roles());
        assert!(staff.permits(&UserRole::Instructor));
        assert!(staff.permits(&UserRole::Admin));
        assert!(!staff.permits(&UserRole::Student));

        let admin = RequireRole::new_any(UserRole::admin_roles());
        assert!(!admin.permits(&UserRole::Instructor));
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let app = init_service(
            App::new().service(
                web::resource("/staff")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = TestRequest::get().uri("/staff").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
