//! 认证相关端点：注册、登录、刷新、登出、校验、密码重置

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info};
use ts_rs::TS;

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::middleware::AuthUser;
use crate::config::get_config;
use crate::services::{AccountService, RegisterRequest};
use crate::storage::SeaOrmStorage;

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, error_from_vinaji, error_response, success_response};
use super::types::{AuthTokens, LoginCredentials, MessageResponse, TS_EXPORT_PATH, UserResponse};

/// 基于 IP 地址的限流 key 提取器（安全版）
///
/// 策略：
/// - 默认使用连接 IP（peer_addr），无法被伪造
/// - 如果连接来自配置的可信代理，则使用 X-Forwarded-For
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();

        // 获取连接 IP（TCP peer address，无法伪造）
        let peer_ip = conn_info
            .peer_addr()
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))?;

        let config = get_config();
        let trusted_proxies = &config.api.trusted_proxies;

        if !trusted_proxies.is_empty() && is_trusted_proxy(peer_ip, trusted_proxies) {
            // 来自可信代理，使用 X-Forwarded-For
            let real_ip = conn_info.realip_remote_addr().unwrap_or(peer_ip);
            debug!("Login rate limit key from trusted proxy: {}", real_ip);
            Ok(real_ip.to_string())
        } else {
            Ok(peer_ip.to_string())
        }
    }
}

/// 检查 IP 是否在可信代理列表中
fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Ok(ip_addr) = ip.parse::<IpAddr>() else {
        return false;
    };

    for proxy in trusted_proxies {
        if proxy.contains('/') {
            if ip_in_cidr(&ip_addr, proxy) {
                return true;
            }
        } else if let Ok(proxy_addr) = proxy.parse::<IpAddr>()
            && ip_addr == proxy_addr
        {
            return true;
        }
    }
    false
}

/// CIDR 检查（简易实现）
fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 创建登录限流器
///
/// 配置：每秒补充 1 个令牌，突发最多 5 次请求
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, governor::middleware::NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub referral_code: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ResetRequestBody {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ResetConfirmBody {
    pub token: uuid::Uuid,
    pub new_password: String,
}

fn issue_tokens(user: migration::entities::user::Model) -> ActixResult<HttpResponse> {
    let jwt = get_jwt_service();
    let access_token = jwt
        .generate_access_token(user.id, user.is_staff)
        .map_err(actix_web::error::ErrorInternalServerError)?;
    let refresh_token = jwt
        .generate_refresh_token(user.id, user.is_staff)
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let cookies = CookieBuilder::from_config();
    let access_cookie = cookies.build_access_cookie(access_token.clone());
    let refresh_cookie = cookies.build_refresh_cookie(refresh_token.clone());

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(super::types::ApiResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data: Some(AuthTokens {
                access_token,
                refresh_token,
                user: UserResponse::from(user),
            }),
        }))
}

/// POST /auth/register
pub async fn register(
    accounts: web::Data<Arc<AccountService>>,
    body: web::Json<RegisterBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match accounts
        .register(RegisterRequest {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            referral_code: body.referral_code,
        })
        .await
    {
        Ok(user) => {
            info!("New registration: {}", user.username);
            issue_tokens(user)
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /auth/login
pub async fn login(
    accounts: web::Data<Arc<AccountService>>,
    body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    match accounts.authenticate(&body.identifier, &body.password).await {
        Ok(user) => issue_tokens(user),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /auth/refresh — 用 refresh token 换新 access token
pub async fn refresh_token(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    // Bearer 或 refresh cookie
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(String::from))
        .or_else(|| req.cookie(constants::REFRESH_COOKIE_NAME).map(|c| c.value().to_string()));

    let Some(token) = token else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Missing refresh token",
        ));
    };

    let claims = match get_jwt_service().validate_refresh_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token validation failed: {}", e);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::TokenExpired,
                "Invalid or expired refresh token",
            ));
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Malformed token subject",
        ));
    };

    // staff 标记可能已经变化，重新读库
    match storage.find_user(user_id).await {
        Ok(Some(user)) if user.is_active => issue_tokens(user),
        Ok(_) => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Account disabled or missing",
        )),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /auth/logout — 清除 cookie
pub async fn logout() -> ActixResult<impl Responder> {
    let cookies = CookieBuilder::from_config();
    Ok(HttpResponse::Ok()
        .cookie(cookies.build_expired_access_cookie())
        .cookie(cookies.build_expired_refresh_cookie())
        .json(super::types::ApiResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data: Some(MessageResponse::new("Logged out")),
        }))
}

/// GET /auth/verify — 校验当前 access token
pub async fn verify_token(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.find_user(auth.id).await {
        Ok(Some(user)) => Ok(success_response(UserResponse::from(user))),
        Ok(None) => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Account missing",
        )),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /auth/password-reset — 签发重置令牌
///
/// 邮件发送不在范围内；令牌直接随响应返回，由外层投递。
pub async fn request_password_reset(
    accounts: web::Data<Arc<AccountService>>,
    body: web::Json<ResetRequestBody>,
) -> ActixResult<impl Responder> {
    match accounts.request_password_reset(&body.email).await {
        Ok(token) => Ok(success_response(serde_json::json!({
            "message": "If the email is registered, a reset token has been issued.",
            "token": token,
        }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /auth/password-reset/confirm
pub async fn confirm_password_reset(
    accounts: web::Data<Arc<AccountService>>,
    body: web::Json<ResetConfirmBody>,
) -> ActixResult<impl Responder> {
    match accounts.reset_password(body.token, &body.new_password).await {
        Ok(()) => Ok(success_response(MessageResponse::new("Password updated"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_in_cidr_v4() {
        let ip: IpAddr = "192.168.1.42".parse().unwrap();
        assert!(ip_in_cidr(&ip, "192.168.1.0/24"));
        assert!(!ip_in_cidr(&ip, "10.0.0.0/8"));
    }

    #[test]
    fn test_ip_in_cidr_invalid() {
        let ip: IpAddr = "192.168.1.42".parse().unwrap();
        assert!(!ip_in_cidr(&ip, "not-a-cidr"));
        assert!(!ip_in_cidr(&ip, "192.168.1.0/99"));
    }

    #[test]
    fn test_trusted_proxy_exact_match() {
        assert!(is_trusted_proxy("10.0.0.1", &["10.0.0.1".to_string()]));
        assert!(!is_trusted_proxy("10.0.0.2", &["10.0.0.1".to_string()]));
    }
}
