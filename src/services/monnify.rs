//! Monnify payment-provider client.
//!
//! Thin typed wrapper over the Monnify REST API: basic-auth login with a
//! cached bearer token (55 minutes, the token itself lives 60), reserved
//! virtual-account creation, bank listing and transaction verification.
//! The `BankingProvider` trait is the seam the KYC workflow and the tests
//! program against.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::ProviderConfig;
use crate::errors::{Result, VinajiError};
use crate::storage::backend::kyc::ProvisionedAccount;

/// token 提前 5 分钟过期，避免边界竞争
const TOKEN_TTL_MINUTES: i64 = 55;

/// 服务商银行条目
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderBankInfo {
    pub code: String,
    pub name: String,
}

/// 服务商侧交易查询结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTransaction {
    pub transaction_reference: String,
    pub payment_status: String,
    pub amount_paid: Option<rust_decimal::Decimal>,
}

/// 预留账户创建请求（contract code 由客户端注入）
#[derive(Debug, Clone)]
pub struct ReservedAccountRequest {
    pub account_reference: String,
    pub account_name: String,
    pub currency_code: String,
    pub customer_email: String,
    pub customer_name: String,
    pub preferred_banks: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReservedAccountPayload {
    account_reference: String,
    account_name: String,
    currency_code: String,
    contract_code: String,
    customer_email: String,
    customer_name: String,
    get_all_available_banks: bool,
    preferred_banks: Vec<String>,
}

/// 虚拟账户与银行同步的外部依赖抽象
#[async_trait]
pub trait BankingProvider: Send + Sync {
    async fn create_reserved_account(
        &self,
        request: ReservedAccountRequest,
    ) -> Result<Vec<ProvisionedAccount>>;

    async fn get_banks(&self) -> Result<Vec<ProviderBankInfo>>;

    async fn verify_transaction(&self, reference: &str) -> Result<Option<ProviderTransaction>>;
}

// ============ Monnify 响应信封 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    request_successful: bool,
    response_message: Option<String>,
    response_body: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservedAccountBody {
    accounts: Vec<ReservedAccountEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservedAccountEntry {
    account_number: String,
    account_name: String,
    bank_name: String,
    bank_code: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Monnify HTTP 客户端
pub struct MonnifyClient {
    http: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
    contract_code: String,
    token: Mutex<Option<CachedToken>>,
}

impl MonnifyClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(VinajiError::config(
                "Monnify 配置不完整，请检查 api_key / secret_key / contract_code",
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            contract_code: config.contract_code.clone(),
            token: Mutex::new(None),
        })
    }

    /// 获取访问令牌，优先使用缓存
    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref()
            && cached.expires_at > Utc::now()
        {
            debug!("Using cached Monnify token");
            return Ok(cached.token.clone());
        }

        let url = format!("{}/api/v1/auth/login", self.base_url);
        debug!("Requesting Monnify token from {}", url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some(&self.secret_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Monnify auth HTTP error: {}", status);
            return Err(VinajiError::provider_auth(format!(
                "HTTP {} during provider login",
                status
            )));
        }

        let envelope: Envelope<LoginBody> = response.json().await?;
        if !envelope.request_successful {
            let message = envelope
                .response_message
                .unwrap_or_else(|| "authentication failed".to_string());
            error!("Monnify auth failed: {}", message);
            return Err(VinajiError::provider_auth(message));
        }

        let body = envelope
            .response_body
            .ok_or_else(|| VinajiError::provider_auth("login response missing body"))?;

        *guard = Some(CachedToken {
            token: body.access_token.clone(),
            expires_at: Utc::now() + chrono::Duration::minutes(TOKEN_TTL_MINUTES),
        });
        info!("Monnify access token obtained");
        Ok(body.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VinajiError::provider(format!(
                "HTTP {} from {}",
                status, path
            )));
        }

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.request_successful {
            return Err(VinajiError::provider(
                envelope
                    .response_message
                    .unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        envelope
            .response_body
            .ok_or_else(|| VinajiError::provider("response missing body"))
    }
}

#[async_trait]
impl BankingProvider for MonnifyClient {
    async fn create_reserved_account(
        &self,
        request: ReservedAccountRequest,
    ) -> Result<Vec<ProvisionedAccount>> {
        let token = self.access_token().await?;
        let url = format!("{}/api/v2/bank-transfer/reserved-accounts", self.base_url);

        info!(
            "Creating Monnify reserved account, reference {}",
            request.account_reference
        );

        let payload = ReservedAccountPayload {
            account_reference: request.account_reference,
            account_name: request.account_name,
            currency_code: request.currency_code,
            contract_code: self.contract_code.clone(),
            customer_email: request.customer_email,
            customer_name: request.customer_name,
            get_all_available_banks: request.preferred_banks.is_empty(),
            preferred_banks: request.preferred_banks,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Monnify reserved-account HTTP error: {}", status);
            return Err(VinajiError::provider(format!(
                "HTTP {} during account creation",
                status
            )));
        }

        let envelope: Envelope<ReservedAccountBody> = response.json().await?;
        if !envelope.request_successful {
            let message = envelope
                .response_message
                .unwrap_or_else(|| "account creation failed".to_string());
            error!("Monnify account creation failed: {}", message);
            return Err(VinajiError::provider(message));
        }

        let body = envelope
            .response_body
            .ok_or_else(|| VinajiError::provider("account creation response missing body"))?;

        Ok(body
            .accounts
            .into_iter()
            .map(|entry| ProvisionedAccount {
                account_number: entry.account_number,
                account_name: entry.account_name,
                bank_name: entry.bank_name,
                bank_code: entry.bank_code,
            })
            .collect())
    }

    async fn get_banks(&self) -> Result<Vec<ProviderBankInfo>> {
        self.get_json("/api/v1/banks").await
    }

    async fn verify_transaction(&self, reference: &str) -> Result<Option<ProviderTransaction>> {
        match self
            .get_json::<ProviderTransaction>(&format!("/api/v2/transactions/{}", reference))
            .await
        {
            Ok(tx) => Ok(Some(tx)),
            Err(VinajiError::Provider(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ============ Webhook 签名 ============

type HmacSha512 = Hmac<Sha512>;

/// 校验 Monnify webhook 签名（对原始 body 的 HMAC-SHA512 hex）
pub fn verify_webhook_signature(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let mut mac = match HmacSha512::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);
    // verify_slice 内部是常数时间比较
    mac.verify_slice(&signature).is_ok()
}

/// 计算 webhook 签名（测试与回放工具用）
pub fn compute_webhook_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_roundtrip() {
        let payload = br#"{"eventType":"SUCCESSFUL_TRANSACTION"}"#;
        let signature = compute_webhook_signature("secret", payload);
        assert!(verify_webhook_signature("secret", payload, &signature));
    }

    #[test]
    fn test_signature_rejects_wrong_secret() {
        let payload = b"payload";
        let signature = compute_webhook_signature("secret-a", payload);
        assert!(!verify_webhook_signature("secret-b", payload, &signature));
    }

    #[test]
    fn test_signature_rejects_tampered_payload() {
        let signature = compute_webhook_signature("secret", b"original");
        assert!(!verify_webhook_signature("secret", b"tampered", &signature));
    }

    #[test]
    fn test_signature_rejects_non_hex() {
        assert!(!verify_webhook_signature("secret", b"payload", "zz-not-hex"));
    }

    #[test]
    fn test_client_requires_configuration() {
        let config = ProviderConfig::default();
        assert!(MonnifyClient::new(&config).is_err());
    }
}
