//! 公共 API 类型定义

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::BalanceSummary;
use migration::entities::{transaction, user, virtual_account};

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../admin-panel/src/services/types.generated.ts";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedResponse<T> {
    pub code: i32,
    pub data: T,
    pub pagination: PaginationInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

/// 通用分页查询参数
#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LoginCredentials {
    /// 用户名或邮箱
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub subscription_level: String,
    pub referral_code: String,
    pub is_verified: bool,
    pub is_staff: bool,
    pub date_joined: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            subscription_level: user.subscription_level,
            referral_code: user.referral_code,
            is_verified: user.is_verified,
            is_staff: user.is_staff,
            date_joined: user.date_joined.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TransactionResponse {
    pub id: i64,
    pub kind: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub reference: String,
    pub description: String,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(tx: transaction::Model) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind,
            amount: tx.amount,
            currency: tx.currency,
            status: tx.status,
            reference: tx.reference,
            description: tx.description,
            created_at: tx.created_at.to_rfc3339(),
            completed_at: tx.completed_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BalanceResponse {
    #[ts(type = "string")]
    pub available: Decimal,
    #[ts(type = "string")]
    pub total_credits: Decimal,
    #[ts(type = "string")]
    pub total_debits: Decimal,
    #[ts(type = "string")]
    pub pending_debits: Decimal,
    pub currency: String,
}

impl BalanceResponse {
    pub fn from_summary(summary: BalanceSummary, currency: String) -> Self {
        Self {
            available: summary.available,
            total_credits: summary.total_credits,
            total_debits: summary.total_debits,
            pending_debits: summary.pending_debits,
            currency,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct VirtualAccountResponse {
    pub id: i64,
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
    pub bank_code: String,
    pub is_active: bool,
    pub is_primary: bool,
}

impl From<virtual_account::Model> for VirtualAccountResponse {
    fn from(account: virtual_account::Model) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            account_name: account.account_name,
            bank_name: account.bank_name,
            bank_code: account.bank_code,
            is_active: account.is_active,
            is_primary: account.is_primary,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
