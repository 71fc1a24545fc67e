//! JWT authentication middleware.
//!
//! Validates the Bearer header or the access cookie, then stores the
//! authenticated identity in the request extensions where the `AuthUser`
//! extractor picks it up. `RequireAuth::staff()` additionally rejects
//! non-staff tokens, guarding the admin scope.

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{info, trace};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::services::{ApiResponse, ErrorCode};

/// 已认证用户，handler 通过 extractor 获取
///
/// staff 作用域由 `RequireAuth::staff()` 中间件提前校验并写入 extensions；
/// 其余端点由 extractor 自己完成 token 校验，公共端点不声明该参数即可。
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub staff: bool,
}

impl AuthUser {
    fn from_http_request(req: &HttpRequest) -> Option<Self> {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer ").map(String::from))
            .or_else(|| {
                req.cookie(constants::ACCESS_COOKIE_NAME)
                    .map(|c| c.value().to_string())
            })?;

        match get_jwt_service().validate_access_token(&token) {
            Ok(claims) => {
                let id = claims.sub.parse().ok()?;
                Some(AuthUser {
                    id,
                    staff: claims.staff,
                })
            }
            Err(e) => {
                info!("Token validation failed: {}", e);
                None
            }
        }
    }

    fn unauthorized_error() -> Error {
        let response = HttpResponse::Unauthorized()
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()> {
                code: ErrorCode::Unauthorized as i32,
                message: "Unauthorized: Invalid or missing token".to_string(),
                data: None,
            });
        actix_web::error::InternalError::from_response("unauthorized", response).into()
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 中间件已经校验过时直接复用
        if let Some(user) = req.extensions().get::<AuthUser>().copied() {
            return ready(Ok(user));
        }

        ready(Self::from_http_request(req).ok_or_else(Self::unauthorized_error))
    }
}

/// 认证中间件工厂
#[derive(Clone, Copy)]
pub struct RequireAuth {
    staff_only: bool,
}

impl RequireAuth {
    /// 普通登录用户
    pub fn user() -> Self {
        Self { staff_only: false }
    }

    /// 仅限 staff（管理端）
    pub fn staff() -> Self {
        Self { staff_only: true }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
            staff_only: self.staff_only,
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
    staff_only: bool,
}

impl<S, B> RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Authentication failed - invalid or missing token");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// Handle authenticated but non-staff requests to staff-only scopes
    fn handle_forbidden(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Staff check failed for user token");
        req.into_response(
            HttpResponse::Forbidden()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Forbidden as i32,
                    message: "Forbidden: staff access required".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    }

    /// Bearer 优先，其次 access cookie
    fn extract_token(req: &ServiceRequest) -> Option<String> {
        Self::extract_bearer_token(req)
            .or_else(|| req.cookie(constants::ACCESS_COOKIE_NAME).map(|c| c.value().to_string()))
    }

    fn validate(req: &ServiceRequest) -> Option<AuthUser> {
        let token = Self::extract_token(req)?;
        let jwt_service = get_jwt_service();
        match jwt_service.validate_access_token(&token) {
            Ok(claims) => {
                let id = claims.sub.parse().ok()?;
                trace!("Token validation successful for user {}", id);
                Some(AuthUser {
                    id,
                    staff: claims.staff,
                })
            }
            Err(e) => {
                info!("Token validation failed: {}", e);
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
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
        let staff_only = self.staff_only;

        Box::pin(async move {
            // CORS 预检直接放行
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(user) = Self::validate(&req) else {
                return Ok(Self::handle_unauthorized(req));
            };

            if staff_only && !user.staff {
                return Ok(Self::handle_forbidden(req));
            }

            req.extensions_mut().insert(user);
            let response = srv.call(req).await?;
            Ok(response.map_into_left_body())
        })
    }
}
