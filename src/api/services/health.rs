//! 健康检查端点

use actix_web::{Responder, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::storage::SeaOrmStorage;

use super::helpers::success_response;

/// 程序启动时间，startup 时注入
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime_seconds: i64,
    storage: StorageHealth,
}

#[derive(Serialize)]
struct StorageHealth {
    status: &'static str,
    backend: String,
}

/// GET /health
pub async fn health_check(
    storage: web::Data<Arc<SeaOrmStorage>>,
    start_time: web::Data<AppStartTime>,
) -> ActixResult<impl Responder> {
    // 一次便宜的查询确认数据库可达
    let storage_ok = storage.site_settings().await.is_ok();

    let response = HealthResponse {
        status: if storage_ok { "healthy" } else { "degraded" },
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: (Utc::now() - start_time.start_datetime).num_seconds(),
        storage: StorageHealth {
            status: if storage_ok { "up" } else { "down" },
            backend: storage.backend_name().to_string(),
        },
    };

    Ok(success_response(response))
}

/// GET /health/live
pub async fn liveness_check() -> ActixResult<impl Responder> {
    Ok(success_response(serde_json::json!({ "status": "alive" })))
}

/// GET /health/ready
pub async fn readiness_check(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let ready = storage.site_settings().await.is_ok();
    Ok(success_response(serde_json::json!({ "ready": ready })))
}
