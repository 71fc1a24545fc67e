//! Operator-tunable settings singleton (row id = 1).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// NGN | USD
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))")]
    pub currency_rate: Decimal,

    // 手续费率（百分比）
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub deposit_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub transfer_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub withdraw_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub withdraw_fixed_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub job_sale_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub course_sale_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub product_sale_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub mentorship_fee_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub min_withdrawal_amount: Decimal,

    // 推广佣金
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub referral_commission_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub referral_signup_reward: Decimal,
    pub auto_approve_commissions: bool,

    /// manual | auto
    pub deposit_mode: String,
    /// manual | auto
    pub withdrawal_mode: String,

    // 手动入账的收款账户
    pub manual_bank_name: Option<String>,
    pub manual_account_number: Option<String>,
    pub manual_account_name: Option<String>,

    /// Prefix for provider account references
    pub account_reference_prefix: String,
    pub default_bank_code: Option<String>,

    pub pause_job_uploading: bool,
    pub pause_course_uploading: bool,
    pub pause_affiliates: bool,

    pub site_title: String,
    pub contact_email: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
