//! 档案与收款方式端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::storage::models::profile_is_complete;
use crate::storage::SeaOrmStorage;
use crate::utils::mask::mask_email;

use super::helpers::{error_from_vinaji, success_response};
use super::types::MessageResponse;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProfileResponse {
    pub bio: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_complete: bool,
    pub masked_email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewBankAccountBody {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(default = "default_account_type")]
    pub account_type: String,
    #[serde(default)]
    pub is_primary: bool,
}

fn default_account_type() -> String {
    "savings".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewCryptoWalletBody {
    pub crypto_type: String,
    pub wallet_address: String,
    pub network: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

const ACCOUNT_TYPES: [&str; 4] = ["savings", "current", "business", "domiciliary"];
const CRYPTO_TYPES: [&str; 4] = ["btc", "eth", "usdt", "bnb"];

/// GET /profile
pub async fn get_profile(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let result: Result<ProfileResponse, VinajiError> = async {
        let user = storage
            .find_user(auth.id)
            .await?
            .ok_or_else(|| VinajiError::not_found("用户不存在"))?;
        let profile = storage
            .get_profile(auth.id)
            .await?
            .ok_or_else(|| VinajiError::not_found("档案不存在"))?;

        Ok(ProfileResponse {
            is_complete: profile_is_complete(&profile),
            bio: profile.bio,
            country: profile.country,
            phone_number: profile.phone_number,
            profile_picture_url: profile.profile_picture_url,
            masked_email: mask_email(&user.email),
        })
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// PUT /profile
pub async fn update_profile(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<ProfilePatch>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match storage
        .update_profile(
            auth.id,
            body.bio,
            body.country,
            body.phone_number,
            body.profile_picture_url,
        )
        .await
    {
        Ok(profile) => Ok(success_response(ProfileResponse {
            is_complete: profile_is_complete(&profile),
            bio: profile.bio,
            country: profile.country,
            phone_number: profile.phone_number,
            profile_picture_url: profile.profile_picture_url,
            masked_email: String::new(),
        })),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /profile/bank-accounts
pub async fn list_bank_accounts(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_bank_accounts(auth.id).await {
        Ok(accounts) => Ok(success_response(accounts)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /profile/bank-accounts
pub async fn add_bank_account(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<NewBankAccountBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if !ACCOUNT_TYPES.contains(&body.account_type.as_str()) {
        return Ok(error_from_vinaji(&VinajiError::validation(format!(
            "账户类型无效: {}",
            body.account_type
        ))));
    }
    if body.account_number.len() < 10 {
        return Ok(error_from_vinaji(&VinajiError::validation(
            "账号长度不足",
        )));
    }

    match storage
        .add_bank_account(
            auth.id,
            body.bank_name,
            body.account_number,
            body.account_name,
            body.account_type,
            body.is_primary,
        )
        .await
    {
        Ok(account) => Ok(success_response(account)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// DELETE /profile/bank-accounts/{id}
pub async fn remove_bank_account(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match storage.remove_bank_account(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(MessageResponse::new("Bank account removed"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /profile/crypto-wallets
pub async fn list_crypto_wallets(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_crypto_wallets(auth.id).await {
        Ok(wallets) => Ok(success_response(wallets)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /profile/crypto-wallets
pub async fn add_crypto_wallet(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<NewCryptoWalletBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if !CRYPTO_TYPES.contains(&body.crypto_type.as_str()) {
        return Ok(error_from_vinaji(&VinajiError::validation(format!(
            "币种无效: {}",
            body.crypto_type
        ))));
    }

    match storage
        .add_crypto_wallet(
            auth.id,
            body.crypto_type,
            body.wallet_address,
            body.network,
            body.is_primary,
        )
        .await
    {
        Ok(wallet) => Ok(success_response(wallet)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// DELETE /profile/crypto-wallets/{id}
pub async fn remove_crypto_wallet(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match storage.remove_crypto_wallet(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(MessageResponse::new("Crypto wallet removed"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
