//! 管理端配置维护端点：站点设置、分类、促销码、订阅方案、银行同步

use actix_web::{Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::middleware::AuthUser;
use crate::api::services::helpers::{error_from_vinaji, success_response};
use crate::errors::VinajiError;
use crate::services::KycService;
use crate::storage::SeaOrmStorage;
use crate::storage::backend::settings::SettingsPatch;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SettingsBody {
    pub currency: Option<String>,
    pub currency_rate: Option<Decimal>,
    pub deposit_fee_pct: Option<Decimal>,
    pub transfer_fee_pct: Option<Decimal>,
    pub withdraw_fee_pct: Option<Decimal>,
    pub withdraw_fixed_fee: Option<Decimal>,
    pub job_sale_fee_pct: Option<Decimal>,
    pub course_sale_fee_pct: Option<Decimal>,
    pub product_sale_fee_pct: Option<Decimal>,
    pub mentorship_fee_pct: Option<Decimal>,
    pub min_withdrawal_amount: Option<Decimal>,
    pub referral_commission_pct: Option<Decimal>,
    pub referral_signup_reward: Option<Decimal>,
    pub auto_approve_commissions: Option<bool>,
    pub deposit_mode: Option<String>,
    pub withdrawal_mode: Option<String>,
    pub manual_bank_name: Option<String>,
    pub manual_account_number: Option<String>,
    pub manual_account_name: Option<String>,
    pub account_reference_prefix: Option<String>,
    pub default_bank_code: Option<String>,
    pub pause_job_uploading: Option<bool>,
    pub pause_course_uploading: Option<bool>,
    pub pause_affiliates: Option<bool>,
    pub site_title: Option<String>,
    pub contact_email: Option<String>,
}

fn validate_pct(value: Option<Decimal>, name: &str) -> Result<(), VinajiError> {
    if let Some(pct) = value
        && !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&pct)
    {
        return Err(VinajiError::validation(format!(
            "{} 必须在 0 到 100 之间",
            name
        )));
    }
    Ok(())
}

/// GET /admin/v1/settings
pub async fn get_settings(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    match storage.site_settings().await {
        Ok(settings) => Ok(success_response(settings)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// PUT /admin/v1/settings
pub async fn update_settings(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<SettingsBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    // 费率上下界与模式取值校验
    let checks = [
        (body.deposit_fee_pct, "deposit_fee_pct"),
        (body.transfer_fee_pct, "transfer_fee_pct"),
        (body.withdraw_fee_pct, "withdraw_fee_pct"),
        (body.job_sale_fee_pct, "job_sale_fee_pct"),
        (body.course_sale_fee_pct, "course_sale_fee_pct"),
        (body.product_sale_fee_pct, "product_sale_fee_pct"),
        (body.mentorship_fee_pct, "mentorship_fee_pct"),
        (body.referral_commission_pct, "referral_commission_pct"),
    ];
    for (value, name) in checks {
        if let Err(e) = validate_pct(value, name) {
            return Ok(error_from_vinaji(&e));
        }
    }
    for mode in [&body.deposit_mode, &body.withdrawal_mode].into_iter().flatten() {
        if mode != "manual" && mode != "auto" {
            return Ok(error_from_vinaji(&VinajiError::validation(format!(
                "模式无效: {}",
                mode
            ))));
        }
    }

    let patch = SettingsPatch {
        currency: body.currency,
        currency_rate: body.currency_rate,
        deposit_fee_pct: body.deposit_fee_pct,
        transfer_fee_pct: body.transfer_fee_pct,
        withdraw_fee_pct: body.withdraw_fee_pct,
        withdraw_fixed_fee: body.withdraw_fixed_fee,
        job_sale_fee_pct: body.job_sale_fee_pct,
        course_sale_fee_pct: body.course_sale_fee_pct,
        product_sale_fee_pct: body.product_sale_fee_pct,
        mentorship_fee_pct: body.mentorship_fee_pct,
        min_withdrawal_amount: body.min_withdrawal_amount,
        referral_commission_pct: body.referral_commission_pct,
        referral_signup_reward: body.referral_signup_reward,
        auto_approve_commissions: body.auto_approve_commissions,
        deposit_mode: body.deposit_mode,
        withdrawal_mode: body.withdrawal_mode,
        manual_bank_name: body.manual_bank_name,
        manual_account_number: body.manual_account_number,
        manual_account_name: body.manual_account_name,
        account_reference_prefix: body.account_reference_prefix,
        default_bank_code: body.default_bank_code,
        pause_job_uploading: body.pause_job_uploading,
        pause_course_uploading: body.pause_course_uploading,
        pause_affiliates: body.pause_affiliates,
        site_title: body.site_title,
        contact_email: body.contact_email,
    };

    match storage.update_site_settings(patch).await {
        Ok(settings) => {
            info!("Admin {} updated site settings", auth.id);
            Ok(success_response(settings))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/settings/sync-banks — 从服务商同步银行列表
pub async fn sync_banks(
    auth: AuthUser,
    kyc: web::Data<Arc<KycService>>,
) -> ActixResult<impl Responder> {
    info!("Admin {} syncing provider banks", auth.id);
    match kyc.sync_banks().await {
        Ok(count) => Ok(success_response(serde_json::json!({ "synced": count }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

// ============ 分类 ============

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateCategoryBody {
    pub name: String,
    pub category_type: String,
    pub description: Option<String>,
}

const CATEGORY_TYPES: [&str; 4] = ["job", "course", "product", "blog"];

/// GET /admin/v1/categories
pub async fn list_categories(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_categories(None).await {
        Ok(categories) => Ok(success_response(categories)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/categories
pub async fn create_category(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<CreateCategoryBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if !CATEGORY_TYPES.contains(&body.category_type.as_str()) {
        return Ok(error_from_vinaji(&VinajiError::validation(format!(
            "分类类型无效: {}",
            body.category_type
        ))));
    }

    match storage
        .create_category(body.name, body.category_type, body.description)
        .await
    {
        Ok(category) => Ok(success_response(category)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

// ============ 促销码 ============

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreatePromoBody {
    pub code: String,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default = "default_max_uses")]
    pub max_uses: i32,
    pub valid_until: chrono::DateTime<chrono::Utc>,
}

fn default_max_uses() -> i32 {
    1
}

/// POST /admin/v1/promo-codes
pub async fn create_promo_code(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<CreatePromoBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if body.discount_percent <= Decimal::ZERO && body.discount_amount <= Decimal::ZERO {
        return Ok(error_from_vinaji(&VinajiError::validation(
            "折扣比例或金额至少填一项",
        )));
    }
    if let Err(e) = validate_pct(Some(body.discount_percent), "discount_percent") {
        return Ok(error_from_vinaji(&e));
    }

    match storage
        .create_promo_code(
            body.code.to_uppercase(),
            body.discount_percent,
            body.discount_amount,
            body.max_uses,
            body.valid_until,
        )
        .await
    {
        Ok(promo) => Ok(success_response(promo)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

// ============ 订阅方案 ============

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpsertPlanBody {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default = "default_duration")]
    pub duration_days: i32,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_duration() -> i32 {
    30
}

/// PUT /admin/v1/subscription-plans
pub async fn upsert_subscription_plan(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<UpsertPlanBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if body.name.parse::<crate::storage::SubscriptionLevel>().is_err() {
        return Ok(error_from_vinaji(&VinajiError::validation(format!(
            "方案名必须是订阅档位之一: {}",
            body.name
        ))));
    }
    if body.price < Decimal::ZERO {
        return Ok(error_from_vinaji(&VinajiError::validation("价格不能为负")));
    }

    match storage
        .upsert_subscription_plan(
            body.name,
            body.description,
            body.price,
            body.duration_days,
            serde_json::json!(body.features),
        )
        .await
    {
        Ok(plan) => Ok(success_response(plan)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
