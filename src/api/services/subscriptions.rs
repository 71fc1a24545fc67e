//! 订阅端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::services::SubscriptionService;
use crate::storage::SeaOrmStorage;

use super::helpers::{error_from_vinaji, success_response};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PurchasePlanBody {
    pub plan_id: i64,
}

/// GET /subscriptions/plans
pub async fn list_plans(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    match storage.list_subscription_plans().await {
        Ok(plans) => Ok(success_response(plans)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /subscriptions/current — 生效中的订阅
pub async fn current_subscription(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    subscriptions: web::Data<Arc<SubscriptionService>>,
) -> ActixResult<impl Responder> {
    let result: Result<serde_json::Value, VinajiError> = async {
        let user = storage
            .find_user(auth.id)
            .await?
            .ok_or_else(|| VinajiError::not_found("用户不存在"))?;
        let level = subscriptions.effective_level(&user).await?;
        let active = storage.active_subscription_of(auth.id).await?;
        Ok(serde_json::json!({
            "level": level,
            "subscription": active,
        }))
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /subscriptions/purchase — 钱包扣款购买
pub async fn purchase_plan(
    auth: AuthUser,
    subscriptions: web::Data<Arc<SubscriptionService>>,
    body: web::Json<PurchasePlanBody>,
) -> ActixResult<impl Responder> {
    match subscriptions.purchase_plan(auth.id, body.plan_id).await {
        Ok(purchase) => Ok(success_response(purchase)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
