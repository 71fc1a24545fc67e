//! Monnify webhook 接收端点
//!
//! 对原始请求体做 HMAC-SHA512 验签，按服务商流水号幂等入账。
//! 未知事件类型确认后忽略，避免服务商无限重投。

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::constants;
use crate::config::get_config;
use crate::services::LedgerService;
use crate::services::monnify::verify_webhook_signature;

use super::error_code::ErrorCode;
use super::helpers::{error_from_vinaji, error_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEnvelope {
    event_type: String,
    #[serde(default)]
    event_data: Option<WebhookEventData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEventData {
    amount: Option<Decimal>,
    transaction_reference: Option<String>,
    destination_account_information: Option<DestinationAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DestinationAccount {
    account_reference: Option<String>,
}

/// POST /webhooks/monnify
pub async fn monnify_webhook(
    req: HttpRequest,
    body: web::Bytes,
    ledger: web::Data<Arc<LedgerService>>,
) -> ActixResult<impl Responder> {
    let secret = &get_config().provider.secret_key;

    let signature = req
        .headers()
        .get(constants::WEBHOOK_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if secret.is_empty() || !verify_webhook_signature(secret, &body, signature) {
        warn!("Webhook rejected: invalid signature");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::WebhookInvalidSignature,
            "Invalid signature",
        ));
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Webhook rejected: malformed JSON: {}", e);
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                "Malformed payload",
            ));
        }
    };

    let envelope: WebhookEnvelope = match serde_json::from_value(payload.clone()) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Webhook rejected: unexpected shape: {}", e);
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                "Unexpected payload shape",
            ));
        }
    };

    if envelope.event_type != "SUCCESSFUL_TRANSACTION" {
        info!("Webhook event {} acknowledged and ignored", envelope.event_type);
        return Ok(HttpResponse::Ok().body("Webhook received"));
    }

    let Some(data) = envelope.event_data else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Missing event data",
        ));
    };

    let (Some(amount), Some(provider_reference)) = (data.amount, data.transaction_reference)
    else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Missing amount or transaction reference",
        ));
    };

    let Some(account_reference) = data
        .destination_account_information
        .and_then(|d| d.account_reference)
    else {
        // 没有账户引用时无法归属，确认后丢弃
        warn!("Webhook without account reference acknowledged");
        return Ok(HttpResponse::Ok().body("Webhook received"));
    };

    match ledger
        .record_provider_deposit(&account_reference, &provider_reference, amount, payload)
        .await
    {
        Ok(Some(_)) => Ok(HttpResponse::Ok().body("Webhook received")),
        // 重复投递或未知账户，确认掉即可
        Ok(None) => Ok(HttpResponse::Ok().body("Webhook received")),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
