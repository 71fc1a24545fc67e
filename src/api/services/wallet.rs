//! 钱包端点：余额、流水、入账、提现、转账

use actix_web::{Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::services::LedgerService;
use crate::storage::{SeaOrmStorage, TransactionFilter};

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::{BalanceResponse, PaginationInfo, TS_EXPORT_PATH, TransactionResponse};

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TransactionListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct WithdrawBody {
    #[ts(type = "string")]
    pub amount: Decimal,
    pub payment_method: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TransferBody {
    pub recipient_username: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ManualDepositBody {
    pub amount: Decimal,
    pub depositor_name: String,
    /// YYYY-MM-DD
    pub deposit_date: chrono::NaiveDate,
    pub proof_url: Option<String>,
}

/// GET /wallet/balance
pub async fn get_balance(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    ledger: web::Data<Arc<LedgerService>>,
) -> ActixResult<impl Responder> {
    let result: Result<BalanceResponse, VinajiError> = async {
        let summary = ledger.balance(auth.id).await?;
        let currency = storage.site_settings().await?.currency;
        Ok(BalanceResponse::from_summary(summary, currency))
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /wallet/transactions — 分页 + 过滤
pub async fn list_transactions(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<TransactionListQuery>,
) -> ActixResult<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    let parse_time = |s: &Option<String>| {
        s.as_ref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    };

    let filter = TransactionFilter {
        kind: query.kind.clone(),
        status: query.status.clone(),
        created_after: parse_time(&query.created_after),
        created_before: parse_time(&query.created_before),
    };

    match storage
        .list_transactions(auth.id, filter, page, page_size)
        .await
    {
        Ok((rows, total)) => {
            let data: Vec<TransactionResponse> =
                rows.into_iter().map(TransactionResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /wallet/deposits/manual — 提交手动入账凭证
pub async fn submit_manual_deposit(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<ManualDepositBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    if body.amount <= Decimal::ZERO {
        return Ok(error_from_vinaji(&VinajiError::validation(
            "金额必须大于零",
        )));
    }

    match storage
        .create_manual_deposit(
            auth.id,
            body.amount,
            body.depositor_name,
            body.deposit_date,
            body.proof_url,
        )
        .await
    {
        Ok(deposit) => Ok(success_response(deposit)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /wallet/deposits/manual — 自己的入账申请
pub async fn list_manual_deposits(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_manual_deposits(Some(auth.id), None).await {
        Ok(deposits) => Ok(success_response(deposits)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /wallet/deposit-details — 手动打款收款账户 + 主虚拟账户
pub async fn deposit_details(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let result: Result<serde_json::Value, VinajiError> = async {
        let settings = storage.site_settings().await?;
        let accounts = storage.list_virtual_accounts(auth.id).await?;
        let primary = accounts.iter().find(|a| a.is_primary && a.is_active);

        Ok(serde_json::json!({
            "deposit_mode": settings.deposit_mode,
            "manual_account": {
                "bank_name": settings.manual_bank_name,
                "account_number": settings.manual_account_number,
                "account_name": settings.manual_account_name,
            },
            "primary_virtual_account": primary.map(|a| super::types::VirtualAccountResponse::from(a.clone())),
        }))
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /wallet/withdrawals
pub async fn request_withdrawal(
    auth: AuthUser,
    ledger: web::Data<Arc<LedgerService>>,
    body: web::Json<WithdrawBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match ledger
        .request_withdrawal(auth.id, body.amount, body.payment_method)
        .await
    {
        Ok(tx) => Ok(success_response(TransactionResponse::from(tx))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /wallet/transfers
pub async fn transfer(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    ledger: web::Data<Arc<LedgerService>>,
    body: web::Json<TransferBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    let recipient = match storage.find_user_by_username(&body.recipient_username).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => {
            return Ok(error_from_vinaji(&VinajiError::not_found(format!(
                "收款用户不存在: {}",
                body.recipient_username
            ))));
        }
        Err(e) => return Ok(error_from_vinaji(&e)),
    };

    match ledger
        .transfer(auth.id, recipient.id, body.amount, body.description)
        .await
    {
        Ok((out_tx, _in_tx)) => Ok(success_response(TransactionResponse::from(out_tx))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /wallet/fees — 当前费率表（前端展示用）
pub async fn fee_schedule(
    _auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.site_settings().await {
        Ok(settings) => Ok(success_response(serde_json::json!({
            "currency": settings.currency,
            "deposit_fee_pct": settings.deposit_fee_pct,
            "transfer_fee_pct": settings.transfer_fee_pct,
            "withdraw_fee_pct": settings.withdraw_fee_pct,
            "withdraw_fixed_fee": settings.withdraw_fixed_fee,
            "min_withdrawal_amount": settings.min_withdrawal_amount,
        }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
