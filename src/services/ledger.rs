//! Wallet ledger service.
//!
//! All money movement goes through here: deposits, withdrawals, transfers
//! and the paired buyer/seller rows behind every marketplace sale. Each
//! multi-row movement runs inside one database transaction, and the balance
//! check happens inside that transaction as well.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{EntityTrait, TransactionTrait};
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{Result, VinajiError};
use crate::storage::backend::wallet::{self, NewTransaction};
use crate::storage::backend::{affiliates, kyc as kyc_store, notifications};
use crate::storage::{BalanceSummary, SaleKind, SeaOrmStorage, TxKind, TxStatus};

use migration::entities::{affiliate_sale, site_setting, transaction};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// 费率表，从站点设置换算而来
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    pub deposit_pct: Decimal,
    pub transfer_pct: Decimal,
    pub withdraw_pct: Decimal,
    pub withdraw_fixed: Decimal,
    pub job_sale_pct: Decimal,
    pub course_sale_pct: Decimal,
    pub product_sale_pct: Decimal,
    pub mentorship_pct: Decimal,
    pub min_withdrawal: Decimal,
    pub referral_commission_pct: Decimal,
}

impl FeeSchedule {
    pub fn from_settings(settings: &site_setting::Model) -> Self {
        Self {
            deposit_pct: settings.deposit_fee_pct,
            transfer_pct: settings.transfer_fee_pct,
            withdraw_pct: settings.withdraw_fee_pct,
            withdraw_fixed: settings.withdraw_fixed_fee,
            job_sale_pct: settings.job_sale_fee_pct,
            course_sale_pct: settings.course_sale_fee_pct,
            product_sale_pct: settings.product_sale_fee_pct,
            mentorship_pct: settings.mentorship_fee_pct,
            min_withdrawal: settings.min_withdrawal_amount,
            referral_commission_pct: settings.referral_commission_pct,
        }
    }

    pub fn pct_of(amount: Decimal, pct: Decimal) -> Decimal {
        (amount * pct / HUNDRED).round_dp(2)
    }

    pub fn sale_fee(&self, kind: SaleKind, gross: Decimal) -> Decimal {
        let pct = match kind {
            SaleKind::Job => self.job_sale_pct,
            SaleKind::Course => self.course_sale_pct,
            SaleKind::Product => self.product_sale_pct,
            SaleKind::Mentorship => self.mentorship_pct,
            SaleKind::Subscription => Decimal::ZERO,
        };
        Self::pct_of(gross, pct)
    }

    pub fn transfer_fee(&self, amount: Decimal) -> Decimal {
        Self::pct_of(amount, self.transfer_pct)
    }

    pub fn withdrawal_fee(&self, amount: Decimal) -> Decimal {
        Self::pct_of(amount, self.withdraw_pct) + self.withdraw_fixed
    }

    pub fn deposit_fee(&self, amount: Decimal) -> Decimal {
        Self::pct_of(amount, self.deposit_pct)
    }

    pub fn commission(&self, gross: Decimal) -> Decimal {
        Self::pct_of(gross, self.referral_commission_pct)
    }
}

/// 配对销售请求
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub buyer_id: i64,
    pub seller_id: i64,
    pub gross: Decimal,
    pub kind: SaleKind,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

/// 配对销售结果
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub buyer_tx: transaction::Model,
    pub seller_tx: transaction::Model,
    pub admin_fee: Decimal,
    pub net_amount: Decimal,
    pub commission: Option<affiliate_sale::Model>,
}

/// 配对销售的事务内实现，供钱包服务与各购买流程共用：
/// 调用方负责开启 / 提交事务，可在同一事务中追加购买记录等写入。
pub async fn record_purchase_on<C: sea_orm::ConnectionTrait>(
    conn: &C,
    settings: &site_setting::Model,
    req: &PurchaseRequest,
) -> Result<PurchaseOutcome> {
    if req.gross <= Decimal::ZERO {
        return Err(VinajiError::validation("金额必须大于零"));
    }
    if req.buyer_id == req.seller_id {
        return Err(VinajiError::validation("不能购买自己发布的内容"));
    }

    let fees = FeeSchedule::from_settings(settings);
    let currency = settings.currency.clone();
    let admin_fee = fees.sale_fee(req.kind, req.gross);
    let net_amount = req.gross - admin_fee;

    let balance = wallet::balance_of(conn, req.buyer_id).await?;
    if balance.available < req.gross {
        return Err(VinajiError::insufficient_balance(format!(
            "余额不足：需要 {}，可用 {}",
            req.gross, balance.available
        )));
    }

    let buyer_tx = wallet::insert_tx(
        conn,
        NewTransaction::completed(
            req.buyer_id,
            TxKind::Purchase,
            req.gross,
            &currency,
            req.description.clone(),
        )
        .with_metadata(
            req.metadata
                .clone()
                .unwrap_or_else(|| json!({ "sale_kind": req.kind.to_string() })),
        ),
    )
    .await?;

    let seller_tx = wallet::insert_tx(
        conn,
        NewTransaction::completed(
            req.seller_id,
            TxKind::Credit,
            req.gross,
            &currency,
            format!("Sale: {}", req.description),
        )
        .with_metadata(json!({
            "sale_kind": req.kind.to_string(),
            "buyer_tx": buyer_tx.reference,
            "admin_fee": admin_fee,
            "net_amount": net_amount,
        })),
    )
    .await?;

    if admin_fee > Decimal::ZERO {
        wallet::insert_tx(
            conn,
            NewTransaction::completed(
                req.seller_id,
                TxKind::Fee,
                admin_fee,
                &currency,
                format!("Admin fee for: {}", req.description),
            )
            .with_metadata(json!({ "sale_tx": seller_tx.reference })),
        )
        .await?;
    }

    // 买家被推荐时登记佣金
    let commission = if !settings.pause_affiliates {
        match affiliates::referral_by_referred(conn, req.buyer_id).await? {
            Some(referral) => {
                let amount = fees.commission(req.gross);
                if amount > Decimal::ZERO {
                    Some(
                        affiliates::insert_affiliate_sale(
                            conn,
                            referral.id,
                            buyer_tx.id,
                            amount,
                            fees.referral_commission_pct,
                            settings.auto_approve_commissions,
                        )
                        .await?,
                    )
                } else {
                    None
                }
            }
            None => None,
        }
    } else {
        None
    };

    notifications::insert_notification(
        conn,
        req.seller_id,
        "transaction",
        "Sale Completed",
        format!("You earned {} {} from a sale.", currency, net_amount),
        Some((seller_tx.id, "transaction")),
    )
    .await?;

    info!(
        "Purchase recorded: buyer {} -> seller {} gross {} fee {}",
        req.buyer_id, req.seller_id, req.gross, admin_fee
    );

    Ok(PurchaseOutcome {
        buyer_tx,
        seller_tx,
        admin_fee,
        net_amount,
        commission,
    })
}

pub struct LedgerService {
    storage: Arc<SeaOrmStorage>,
}

impl LedgerService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn fees(&self) -> Result<FeeSchedule> {
        let settings = self.storage.site_settings().await?;
        Ok(FeeSchedule::from_settings(&settings))
    }

    async fn currency(&self) -> Result<String> {
        Ok(self.storage.site_settings().await?.currency)
    }

    pub async fn balance(&self, user_id: i64) -> Result<BalanceSummary> {
        self.storage.balance(user_id).await
    }

    /// 买卖双方配对记账：买家借记全额，卖家贷记全额并借记平台费，
    /// 买家有推荐人且推广未暂停时登记佣金。全程单事务。
    pub async fn record_purchase(&self, req: PurchaseRequest) -> Result<PurchaseOutcome> {
        let settings = self.storage.site_settings().await?;
        let txn = self.storage.get_db().begin().await?;
        let outcome = record_purchase_on(&txn, &settings, &req).await?;
        txn.commit().await?;
        Ok(outcome)
    }

    /// 站内转账：发送方借记金额 + 手续费，接收方贷记金额。单事务。
    pub async fn transfer(
        &self,
        sender_id: i64,
        recipient_id: i64,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<(transaction::Model, transaction::Model)> {
        if amount <= Decimal::ZERO {
            return Err(VinajiError::validation("金额必须大于零"));
        }
        if sender_id == recipient_id {
            return Err(VinajiError::validation("不能给自己转账"));
        }

        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        let currency = settings.currency.clone();
        let fee = fees.transfer_fee(amount);
        let total_debit = amount + fee;
        let note = description.unwrap_or_default();

        let txn = self.storage.get_db().begin().await?;

        let balance = wallet::balance_of(&txn, sender_id).await?;
        if balance.available < total_debit {
            return Err(VinajiError::insufficient_balance(format!(
                "余额不足：需要 {}（含手续费 {}），可用 {}",
                total_debit, fee, balance.available
            )));
        }

        let out_tx = wallet::insert_tx(
            &txn,
            NewTransaction::completed(
                sender_id,
                TxKind::TransferOut,
                amount,
                &currency,
                format!("Transfer to user {}: {}", recipient_id, note),
            )
            .with_metadata(json!({
                "recipient_id": recipient_id,
                "transfer_amount": amount,
                "admin_fee": fee,
            })),
        )
        .await?;

        let in_tx = wallet::insert_tx(
            &txn,
            NewTransaction::completed(
                recipient_id,
                TxKind::TransferIn,
                amount,
                &currency,
                format!("Transfer from user {}: {}", sender_id, note),
            )
            .with_metadata(json!({
                "sender_id": sender_id,
                "sender_fee": fee,
            })),
        )
        .await?;

        if fee > Decimal::ZERO {
            wallet::insert_tx(
                &txn,
                NewTransaction::completed(
                    sender_id,
                    TxKind::Fee,
                    fee,
                    &currency,
                    format!("Transfer fee for transaction {}", out_tx.reference),
                )
                .with_metadata(json!({ "fee_type": "transfer_fee" })),
            )
            .await?;
        }

        notifications::insert_notification(
            &txn,
            recipient_id,
            "transaction",
            "Money Transfer",
            format!("{} {} has been transferred to you.", currency, amount),
            Some((in_tx.id, "transaction")),
        )
        .await?;

        txn.commit().await?;
        info!(
            "Transfer: {} -> {} amount {} fee {}",
            sender_id, recipient_id, amount, fee
        );
        Ok((out_tx, in_tx))
    }

    /// 提现申请：单条 pending 借记（金额含手续费），冻结可用余额，
    /// 等待管理员审批。
    pub async fn request_withdrawal(
        &self,
        user_id: i64,
        amount: Decimal,
        payment_method: String,
    ) -> Result<transaction::Model> {
        if amount <= Decimal::ZERO {
            return Err(VinajiError::validation("金额必须大于零"));
        }

        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        if amount < fees.min_withdrawal {
            return Err(VinajiError::validation(format!(
                "最低提现金额为 {}",
                fees.min_withdrawal
            )));
        }

        let currency = settings.currency.clone();
        let fee = fees.withdrawal_fee(amount);
        let total_debit = amount + fee;

        let txn = self.storage.get_db().begin().await?;

        let balance = wallet::balance_of(&txn, user_id).await?;
        if balance.available < total_debit {
            return Err(VinajiError::insufficient_balance(format!(
                "余额不足：需要 {}（含手续费 {}），可用 {}",
                total_debit, fee, balance.available
            )));
        }

        let tx = wallet::insert_tx(
            &txn,
            NewTransaction {
                user_id,
                kind: TxKind::Withdrawal,
                amount: total_debit,
                currency: currency.clone(),
                status: TxStatus::Pending,
                reference: None,
                description: format!("Withdrawal request - {} (Fee: {})", amount, fee),
                metadata: Some(json!({
                    "withdrawal_amount": amount,
                    "admin_fee": fee,
                    "net_amount": amount,
                    "payment_method": payment_method,
                })),
            },
        )
        .await?;

        notifications::insert_notification(
            &txn,
            user_id,
            "transaction",
            "Withdrawal Request",
            format!(
                "Your withdrawal request of {} {} is being processed.",
                currency, amount
            ),
            Some((tx.id, "transaction")),
        )
        .await?;

        txn.commit().await?;
        info!("Withdrawal requested: user {} total {}", user_id, total_debit);
        Ok(tx)
    }

    /// 管理员审批提现
    pub async fn review_withdrawal(
        &self,
        tx_id: i64,
        approve: bool,
    ) -> Result<transaction::Model> {
        let tx = self
            .storage
            .find_tx(tx_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("流水不存在: {}", tx_id)))?;

        if tx.kind != TxKind::Withdrawal.to_string() {
            return Err(VinajiError::validation("只能审批提现流水"));
        }
        if tx.status != TxStatus::Pending.to_string() {
            return Err(VinajiError::conflict(format!(
                "流水已处理过: {}",
                tx.status
            )));
        }

        let status = if approve { TxStatus::Completed } else { TxStatus::Rejected };
        let updated = self.storage.update_tx_status(tx_id, status).await?;

        let (title, message) = if approve {
            (
                "Withdrawal Completed",
                format!(
                    "Your withdrawal of {} {} has been completed.",
                    updated.currency, updated.amount
                ),
            )
        } else {
            (
                "Transaction Rejected",
                "Your withdrawal transaction has been rejected.".to_string(),
            )
        };
        notifications::insert_notification(
            self.storage.get_db(),
            updated.user_id,
            "transaction",
            title,
            message,
            Some((updated.id, "transaction")),
        )
        .await?;

        Ok(updated)
    }

    /// Webhook 入账：按服务商流水号幂等。重复投递返回 Ok(None)。
    pub async fn record_provider_deposit(
        &self,
        account_reference: &str,
        provider_reference: &str,
        amount: Decimal,
        payload: serde_json::Value,
    ) -> Result<Option<transaction::Model>> {
        if amount <= Decimal::ZERO {
            return Err(VinajiError::validation("入账金额必须大于零"));
        }

        let currency = self.currency().await?;
        let txn = self.storage.get_db().begin().await?;

        if wallet::tx_by_reference(&txn, provider_reference).await?.is_some() {
            warn!(
                "Duplicate provider deposit ignored: {}",
                provider_reference
            );
            return Ok(None);
        }

        let Some(account) =
            kyc_store::virtual_account_by_reference(&txn, account_reference).await?
        else {
            warn!(
                "Provider deposit for unknown account reference: {}",
                account_reference
            );
            return Ok(None);
        };

        let tx = wallet::insert_tx(
            &txn,
            NewTransaction::completed(
                account.user_id,
                TxKind::Deposit,
                amount,
                &currency,
                format!("Deposit to virtual account {}", account.account_number),
            )
            .with_reference(provider_reference)
            .with_metadata(payload),
        )
        .await?;

        notifications::insert_notification(
            &txn,
            account.user_id,
            "transaction",
            "Money Added",
            format!("{} {} has been added to your account.", currency, amount),
            Some((tx.id, "transaction")),
        )
        .await?;

        txn.commit().await?;
        info!(
            "Provider deposit recorded: user {} amount {} ref {}",
            account.user_id, amount, provider_reference
        );
        Ok(Some(tx))
    }

    /// 管理员审批手动入账；通过时贷记金额并按费率借记入账手续费
    pub async fn review_manual_deposit(
        &self,
        deposit_id: i64,
        reviewer: i64,
        approve: bool,
        notes: Option<String>,
    ) -> Result<Option<transaction::Model>> {
        let deposit = self
            .storage
            .find_manual_deposit(deposit_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("手动入账不存在: {}", deposit_id)))?;

        if deposit.status != "pending" {
            return Err(VinajiError::conflict(format!(
                "入账申请已处理过: {}",
                deposit.status
            )));
        }

        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        let currency = settings.currency.clone();

        let txn = self.storage.get_db().begin().await?;

        let status = if approve { "approved" } else { "rejected" };
        let deposit =
            wallet::set_manual_deposit_status(&txn, deposit, status, reviewer, notes).await?;

        let result = if approve {
            let reference = format!("MD-{}", deposit.id);
            if wallet::tx_by_reference(&txn, &reference).await?.is_some() {
                return Err(VinajiError::conflict("该入账已生成流水"));
            }

            let tx = wallet::insert_tx(
                &txn,
                NewTransaction::completed(
                    deposit.user_id,
                    TxKind::Deposit,
                    deposit.amount,
                    &currency,
                    format!("Manual deposit by {}", deposit.depositor_name),
                )
                .with_reference(reference),
            )
            .await?;

            let fee = fees.deposit_fee(deposit.amount);
            if fee > Decimal::ZERO {
                wallet::insert_tx(
                    &txn,
                    NewTransaction::completed(
                        deposit.user_id,
                        TxKind::Fee,
                        fee,
                        &currency,
                        format!("Deposit fee for manual deposit {}", deposit.id),
                    ),
                )
                .await?;
            }

            notifications::insert_notification(
                &txn,
                deposit.user_id,
                "transaction",
                "Money Added Successfully",
                format!(
                    "{} {} has been successfully added to your account.",
                    currency, deposit.amount
                ),
                Some((tx.id, "transaction")),
            )
            .await?;

            Some(tx)
        } else {
            notifications::insert_notification(
                &txn,
                deposit.user_id,
                "transaction",
                "Deposit Rejected",
                "Your manual deposit could not be verified.".to_string(),
                Some((deposit.id, "manual_deposit")),
            )
            .await?;
            None
        };

        txn.commit().await?;
        Ok(result)
    }

    /// 管理员：佣金打款。推荐人贷记佣金额。
    pub async fn pay_commission(&self, sale_id: i64) -> Result<transaction::Model> {
        let sale = self
            .storage
            .find_affiliate_sale(sale_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("佣金记录不存在: {}", sale_id)))?;

        if sale.status == "paid" {
            return Err(VinajiError::conflict("佣金已打款"));
        }
        if sale.status == "rejected" {
            return Err(VinajiError::conflict("佣金已被驳回"));
        }

        let currency = self.currency().await?;
        let txn = self.storage.get_db().begin().await?;

        // 从推荐关系找到收款人
        let referral = migration::entities::referral::Entity::find_by_id(sale.referral_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                VinajiError::not_found(format!("推荐关系不存在: {}", sale.referral_id))
            })?;

        let amount = sale.commission_amount;
        let tx = wallet::insert_tx(
            &txn,
            NewTransaction::completed(
                referral.referrer_id,
                TxKind::Credit,
                amount,
                &currency,
                format!("Affiliate commission for sale #{}", sale.transaction_id),
            )
            .with_metadata(json!({ "affiliate_sale_id": sale.id })),
        )
        .await?;

        affiliates::set_affiliate_sale_status(&txn, sale, "paid").await?;

        notifications::insert_notification(
            &txn,
            referral.referrer_id,
            "transaction",
            "Commission Earned",
            format!("You earned {} {} in commission.", currency, amount),
            Some((tx.id, "transaction")),
        )
        .await?;

        txn.commit().await?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn schedule() -> FeeSchedule {
        FeeSchedule {
            deposit_pct: dec!(1.5),
            transfer_pct: dec!(0.5),
            withdraw_pct: dec!(1.0),
            withdraw_fixed: dec!(50),
            job_sale_pct: dec!(2.0),
            course_sale_pct: dec!(3.0),
            product_sale_pct: dec!(2.5),
            mentorship_pct: dec!(5.0),
            min_withdrawal: dec!(1000),
            referral_commission_pct: dec!(5.0),
        }
    }

    #[test]
    fn test_pct_of_rounds_to_kobo() {
        assert_eq!(FeeSchedule::pct_of(dec!(1000), dec!(2.5)), dec!(25));
        assert_eq!(FeeSchedule::pct_of(dec!(333.33), dec!(1.0)), dec!(3.33));
    }

    #[test]
    fn test_sale_fee_by_kind() {
        let fees = schedule();
        assert_eq!(fees.sale_fee(SaleKind::Job, dec!(10000)), dec!(200));
        assert_eq!(fees.sale_fee(SaleKind::Course, dec!(10000)), dec!(300));
        assert_eq!(fees.sale_fee(SaleKind::Product, dec!(10000)), dec!(250));
        assert_eq!(fees.sale_fee(SaleKind::Mentorship, dec!(10000)), dec!(500));
        assert_eq!(
            fees.sale_fee(SaleKind::Subscription, dec!(10000)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_withdrawal_fee_includes_fixed_part() {
        let fees = schedule();
        // 1% of 5000 + 50 fixed
        assert_eq!(fees.withdrawal_fee(dec!(5000)), dec!(100));
    }

    #[test]
    fn test_commission_rate() {
        let fees = schedule();
        assert_eq!(fees.commission(dec!(2000)), dec!(100));
    }
}
