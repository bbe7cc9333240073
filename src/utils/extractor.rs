//! 路径参数提取器
//!
//! 路径中的 ID 不合法时直接返回统一的 JSON 错误，而不是 actix 默认的纯文本 404。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, http::StatusCode,
};
use futures_util::future::{Ready, ready};
use std::fmt;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Debug)]
pub struct InvalidPathId {
    name: String,
    value: String,
}

impl fmt::Display for InvalidPathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid path parameter {}: '{}'", self.name, self.value)
    }
}

impl ResponseError for InvalidPathId {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            self.to_string(),
        ))
    }
}

/// 正整数 ID，取路由中的 `{id}` 段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

impl FromRequest for SafeIDI64 {
    type Error = InvalidPathId;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(parse_positive_id(raw).map(SafeIDI64).ok_or_else(|| InvalidPathId {
            name: "id".to_string(),
            value: raw.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("abc"), None);
    }

    #[actix_web::test]
    async fn test_extracts_from_match_info() {
        let req = TestRequest::default().param("id", "7").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(7));

        let req = TestRequest::default().param("id", "x7").to_http_request();
        let err = SafeIDI64::extract(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
