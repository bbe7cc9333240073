/*!
 * 认证接口的速率限制
 *
 * 固定窗口计数，按客户端 IP 区分。窗口内超出次数返回 429，
 * `Retry-After` 为当前窗口剩余秒数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::{net::IpAddr, rc::Rc, time::Duration};
use tracing::warn;

use crate::models::ErrorCode;

use super::create_error_response;

// 键为 scope:ip:窗口序号；最长窗口一小时，过期即清理
static WINDOW_COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone, Copy)]
pub struct RateLimit {
    scope: &'static str,
    max_requests: u32,
    window_secs: u64,
}

impl RateLimit {
    const fn new(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            scope,
            max_requests,
            window_secs,
        }
    }

    /// 每个 IP 每分钟 5 次登录
    pub const fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 每个 IP 每分钟 10 次刷新
    pub const fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    fn window(&self, client: &str, now_secs: u64) -> (String, u64) {
        let index = now_secs / self.window_secs;
        let retry_after = self.window_secs - now_secs % self.window_secs;
        (format!("{}:{client}:{index}", self.scope), retry_after)
    }
}

// 反向代理写入的 X-Forwarded-For 首个地址优先，否则取对端地址
fn client_ip(req: &ServiceRequest) -> String {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());

    match forwarded {
        Some(ip) => ip.to_string(),
        None => req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: *self,
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit;

        Box::pin(async move {
            let now_secs = chrono::Utc::now().timestamp().max(0) as u64;
            let (key, retry_after) = limit.window(&client_ip(&req), now_secs);

            let count = WINDOW_COUNTERS
                .entry(key.clone())
                .and_upsert_with(|current| ready(current.map_or(1, |e| e.into_value() + 1)))
                .await
                .into_value();

            if count > limit.max_requests {
                warn!("Rate limit hit on {} ({} requests)", key, count);
                let mut resp = create_error_response(
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorCode::RateLimitExceeded,
                    "Too many requests, please try again later",
                );
                resp.headers_mut().insert(
                    actix_web::http::header::RETRY_AFTER,
                    retry_after.into(),
                );
                return Ok(req.into_response(resp.map_into_right_body()));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test::{TestRequest, call_service, init_service}, web};

    #[test]
    fn test_window_rolls_over() {
        let limit = RateLimit::login();
        let (first, retry) = limit.window("1.2.3.4", 120);
        assert_eq!(first, "login:1.2.3.4:2");
        assert_eq!(retry, 60);

        let (same, retry) = limit.window("1.2.3.4", 179);
        assert_eq!(same, first);
        assert_eq!(retry, 1);

        let (next, _) = limit.window("1.2.3.4", 180);
        assert_ne!(next, first);
    }

    #[actix_web::test]
    async fn test_rejects_after_limit() {
        let app = init_service(
            App::new().service(
                web::resource("/burst")
                    .wrap(RateLimit::new("burst-test", 2, 3600))
                    .route(web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let send = || {
            TestRequest::post()
                .uri("/burst")
                .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
                .to_request()
        };

        assert!(call_service(&app, send()).await.status().is_success());
        assert!(call_service(&app, send()).await.status().is_success());

        let resp = call_service(&app, send()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));
    }
}
