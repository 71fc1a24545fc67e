//! 推广端点（推荐人视角）

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::storage::SeaOrmStorage;
use crate::utils::mask::mask_email;

use super::helpers::{error_from_vinaji, success_response};

/// GET /affiliates/referrals — 我带来的注册
pub async fn my_referrals(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let result: Result<Vec<serde_json::Value>, VinajiError> = async {
        let referrals = storage.list_referrals_of(auth.id).await?;
        let mut entries = Vec::with_capacity(referrals.len());
        for referral in referrals {
            let referred = storage.find_user(referral.referred_user_id).await?;
            entries.push(serde_json::json!({
                "id": referral.id,
                "joined_at": referral.joined_at.to_rfc3339(),
                "is_active": referral.is_active,
                // 展示打码邮箱而不是完整身份
                "referred_user": referred.map(|u| mask_email(&u.email)),
            }));
        }
        Ok(entries)
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /affiliates/commissions — 我的佣金记录
pub async fn my_commissions(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_affiliate_sales_of(auth.id).await {
        Ok(sales) => Ok(success_response(sales)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /affiliates/link — 我的推荐码
pub async fn my_referral_code(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let result: Result<serde_json::Value, VinajiError> = async {
        let user = storage
            .find_user(auth.id)
            .await?
            .ok_or_else(|| VinajiError::not_found("用户不存在"))?;
        let settings = storage.site_settings().await?;
        Ok(serde_json::json!({
            "referral_code": user.referral_code,
            "commission_pct": settings.referral_commission_pct,
            "signup_reward": settings.referral_signup_reward,
            "program_paused": settings.pause_affiliates,
        }))
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
