//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use super::types::TS_EXPORT_PATH;
use crate::errors::VinajiError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 钱包 / 账本错误
/// - 4000-4099: KYC / 服务商错误
/// - 5000-5099: 列表内容错误
/// - 6000-6099: Webhook 错误
/// - 7000-7099: 设置 / 管理错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,

    // 钱包 / 账本错误 3000-3099
    InsufficientBalance = 3000,
    BelowMinimumWithdrawal = 3001,
    DuplicateReference = 3002,
    TransactionNotFound = 3003,
    TransactionAlreadyProcessed = 3004,

    // KYC / 服务商错误 4000-4099
    KycNotFound = 4000,
    KycAlreadyApproved = 4001,
    KycNotApproved = 4002,
    ProvisioningFailed = 4003,
    ProviderError = 4004,
    ProviderAuthError = 4005,

    // 列表内容错误 5000-5099
    ListingNotFound = 5000,
    ListingNotAvailable = 5001,
    DuplicatePurchase = 5002,
    PromoCodeInvalid = 5003,
    SubscriptionRequired = 5004,
    ProfileIncomplete = 5005,

    // Webhook 错误 6000-6099
    WebhookInvalidSignature = 6000,
    WebhookUnknownAccount = 6001,

    // 设置 / 管理错误 7000-7099
    SettingsUpdateFailed = 7000,
}

impl From<VinajiError> for ErrorCode {
    fn from(err: VinajiError) -> Self {
        match err {
            VinajiError::Validation(_) => ErrorCode::BadRequest,
            VinajiError::NotFound(_) => ErrorCode::NotFound,
            VinajiError::Unauthorized(_) => ErrorCode::Unauthorized,
            VinajiError::Forbidden(_) => ErrorCode::Forbidden,
            VinajiError::Conflict(_) => ErrorCode::Conflict,
            VinajiError::InsufficientBalance(_) => ErrorCode::InsufficientBalance,
            VinajiError::Provider(_) => ErrorCode::ProviderError,
            VinajiError::ProviderAuth(_) => ErrorCode::ProviderAuthError,
            VinajiError::SignatureInvalid(_) => ErrorCode::WebhookInvalidSignature,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(VinajiError::insufficient_balance("x")),
            ErrorCode::InsufficientBalance
        );
        assert_eq!(
            ErrorCode::from(VinajiError::signature_invalid("x")),
            ErrorCode::WebhookInvalidSignature
        );
        assert_eq!(
            ErrorCode::from(VinajiError::database_operation("x")),
            ErrorCode::InternalServerError
        );
    }

    #[test]
    fn test_error_code_values_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::InsufficientBalance as i32, 3000);
        assert_eq!(ErrorCode::WebhookInvalidSignature as i32, 6000);
    }
}
