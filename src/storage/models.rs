//! Domain value types shared between storage, services and API layers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 账本流水方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxDirection {
    Credit,
    Debit,
}

/// 账本流水类型
///
/// 每种类型都有确定的方向；余额 = 已完成贷方合计 − 已完成借方合计。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TxKind {
    Deposit,
    Credit,
    Refund,
    TransferIn,
    Purchase,
    Withdrawal,
    TransferOut,
    Fee,
}

impl TxKind {
    pub fn direction(&self) -> TxDirection {
        match self {
            TxKind::Deposit | TxKind::Credit | TxKind::Refund | TxKind::TransferIn => {
                TxDirection::Credit
            }
            TxKind::Purchase | TxKind::Withdrawal | TxKind::TransferOut | TxKind::Fee => {
                TxDirection::Debit
            }
        }
    }

    pub fn credit_kinds() -> [&'static str; 4] {
        ["deposit", "credit", "refund", "transfer_in"]
    }

    pub fn debit_kinds() -> [&'static str; 4] {
        ["purchase", "withdrawal", "transfer_out", "fee"]
    }
}

/// 流水状态
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
    Rejected,
}

/// 列表内容审核状态（职位/课程/商品/导师）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

/// KYC 审核状态
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
    NeedsRevision,
}

/// 订阅档位，支持排序比较
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionLevel {
    #[default]
    Starter,
    Pro,
    Mentorship,
}

/// 交易归属的商品类别（决定费率和佣金挂钩）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SaleKind {
    Job,
    Course,
    Product,
    Mentorship,
    Subscription,
}

/// 用户钱包余额汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// 可用余额：已完成贷方 − 已完成借方 − 待处理借方
    pub available: Decimal,
    pub total_credits: Decimal,
    pub total_debits: Decimal,
    /// 提现等待审批中被冻结的金额
    pub pending_debits: Decimal,
}

/// 档案完整性检查，发布内容前需要补全资料
pub fn profile_is_complete(profile: &migration::entities::user_profile::Model) -> bool {
    let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
    filled(&profile.bio) && filled(&profile.country) && filled(&profile.phone_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tx_kind_directions_partition() {
        use strum::IntoEnumIterator;
        for kind in TxKind::iter() {
            let as_str = kind.as_ref();
            match kind.direction() {
                TxDirection::Credit => assert!(TxKind::credit_kinds().contains(&as_str)),
                TxDirection::Debit => assert!(TxKind::debit_kinds().contains(&as_str)),
            }
        }
    }

    #[test]
    fn test_tx_kind_string_roundtrip() {
        assert_eq!(TxKind::TransferOut.to_string(), "transfer_out");
        assert_eq!(TxKind::from_str("transfer_out").unwrap(), TxKind::TransferOut);
        assert!(TxKind::from_str("add_money").is_err());
    }

    #[test]
    fn test_subscription_level_ordering() {
        assert!(SubscriptionLevel::Starter < SubscriptionLevel::Pro);
        assert!(SubscriptionLevel::Pro < SubscriptionLevel::Mentorship);
        assert_eq!(SubscriptionLevel::default(), SubscriptionLevel::Starter);
    }

    #[test]
    fn test_listing_status_parse() {
        assert_eq!(
            ListingStatus::from_str("approved").unwrap(),
            ListingStatus::Approved
        );
        assert_eq!(ListingStatus::Pending.to_string(), "pending");
    }
}
