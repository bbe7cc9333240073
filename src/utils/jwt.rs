//! 访问令牌与刷新令牌
//!
//! access token 放在 `Authorization` 头中，刷新令牌只通过 HttpOnly cookie 传递，
//! cookie 的路径限定在认证接口下。

use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors};
use serde::{Deserialize, Serialize};

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";
const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";
const ISSUER: &str = "dojo-server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户ID
    pub role: UserRole,
    pub token_type: TokenType,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    // 刷新令牌有效期（秒），同时作为 cookie 的 max-age
    pub refresh_expires_in: i64,
}

fn sign(
    secret: &str,
    user_id: i64,
    role: &UserRole,
    token_type: TokenType,
    ttl: chrono::Duration,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<String, errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.clone(),
        token_type,
        iss: ISSUER.to_string(),
        exp: (now + ttl).timestamp().max(0) as usize,
        iat: now.timestamp().max(0) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(secret: &str, token: &str, expected: TokenType) -> Result<Claims, errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?
    .claims;

    // access token 不能当作刷新令牌使用，反之亦然
    if claims.token_type != expected {
        return Err(errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    pub fn generate_access_token(user_id: i64, role: &UserRole) -> Result<String, errors::Error> {
        let ttl = chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry);
        sign(
            Self::secret(),
            user_id,
            role,
            TokenType::Access,
            ttl,
            chrono::Utc::now(),
        )
    }

    /// 生成令牌对；`refresh_ttl` 为空时使用配置的默认有效期
    pub fn generate_token_pair(
        user_id: i64,
        role: &UserRole,
        refresh_ttl: Option<chrono::Duration>,
    ) -> Result<TokenPair, errors::Error> {
        let refresh_ttl = refresh_ttl
            .unwrap_or_else(|| chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry));
        let now = chrono::Utc::now();

        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: sign(
                Self::secret(),
                user_id,
                role,
                TokenType::Refresh,
                refresh_ttl,
                now,
            )?,
            refresh_expires_in: refresh_ttl.num_seconds(),
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, errors::Error> {
        verify(Self::secret(), token, TokenType::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, errors::Error> {
        verify(Self::secret(), token, TokenType::Refresh)
    }

    fn build_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, value)
            .path(REFRESH_COOKIE_PATH)
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(pair: &TokenPair) -> Cookie<'static> {
        Self::build_cookie(pair.refresh_token.clone(), pair.refresh_expires_in)
    }

    /// max-age 为 0 的空 cookie，客户端收到后删除刷新令牌
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::build_cookie(String::new(), 0)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn token(token_type: TokenType, ttl: chrono::Duration) -> String {
        sign(
            SECRET,
            42,
            &UserRole::Instructor,
            token_type,
            ttl,
            chrono::Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_round_trip() {
        let access = token(TokenType::Access, chrono::Duration::minutes(15));
        let claims = verify(SECRET, &access, TokenType::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, UserRole::Instructor);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let refresh = token(TokenType::Refresh, chrono::Duration::days(7));
        assert!(verify(SECRET, &refresh, TokenType::Access).is_err());
        assert!(verify(SECRET, &refresh, TokenType::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let access = token(TokenType::Access, chrono::Duration::minutes(15));
        assert!(verify("another-secret", &access, TokenType::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 超过默认的 60 秒容差
        let expired = token(TokenType::Access, chrono::Duration::minutes(-10));
        let err = verify(SECRET, &expired, TokenType::Access).unwrap_err();
        assert!(matches!(err.kind(), errors::ErrorKind::ExpiredSignature));
    }
}
