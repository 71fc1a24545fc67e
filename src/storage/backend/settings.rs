//! Site settings singleton (row id = 1) with a short-TTL in-process cache.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::site_setting;

/// 管理端可更新的字段；None 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
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

impl SeaOrmStorage {
    /// 读取站点设置；不存在时落默认行（id = 1）
    pub async fn site_settings(&self) -> Result<site_setting::Model> {
        if let Some(cached) = self.settings_cache().get(&()) {
            return Ok(cached);
        }

        let settings = match site_setting::Entity::find_by_id(1).one(&self.db).await? {
            Some(model) => model,
            None => {
                let now = Utc::now();
                let model = site_setting::ActiveModel {
                    id: Set(1),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                info!("Site settings row created with defaults");
                model
            }
        };

        self.settings_cache().insert((), settings.clone());
        Ok(settings)
    }

    pub async fn update_site_settings(&self, patch: SettingsPatch) -> Result<site_setting::Model> {
        let current = self.site_settings().await?;
        let mut active: site_setting::ActiveModel = current.into();

        macro_rules! apply {
            ($field:ident) => {
                if let Some(value) = patch.$field {
                    active.$field = Set(value);
                }
            };
            (opt $field:ident) => {
                if patch.$field.is_some() {
                    active.$field = Set(patch.$field);
                }
            };
        }

        apply!(currency);
        apply!(currency_rate);
        apply!(deposit_fee_pct);
        apply!(transfer_fee_pct);
        apply!(withdraw_fee_pct);
        apply!(withdraw_fixed_fee);
        apply!(job_sale_fee_pct);
        apply!(course_sale_fee_pct);
        apply!(product_sale_fee_pct);
        apply!(mentorship_fee_pct);
        apply!(min_withdrawal_amount);
        apply!(referral_commission_pct);
        apply!(referral_signup_reward);
        apply!(auto_approve_commissions);
        apply!(deposit_mode);
        apply!(withdrawal_mode);
        apply!(opt manual_bank_name);
        apply!(opt manual_account_number);
        apply!(opt manual_account_name);
        apply!(account_reference_prefix);
        apply!(opt default_bank_code);
        apply!(pause_job_uploading);
        apply!(pause_course_uploading);
        apply!(pause_affiliates);
        apply!(site_title);
        apply!(contact_email);

        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.db).await?;

        self.settings_cache().invalidate(&());
        info!("Site settings updated");
        Ok(updated)
    }
}
