//! KYC 与虚拟账户端点（用户侧）

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::services::KycService;
use crate::storage::SeaOrmStorage;
use crate::storage::backend::kyc::KycSubmission;

use super::helpers::{error_from_vinaji, success_response};
use super::types::{MessageResponse, VirtualAccountResponse};

const ID_TYPES: [&str; 4] = ["bvn", "nin", "drivers_license", "international_passport"];

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KycSubmitBody {
    pub id_type: String,
    pub id_number: String,
    pub legal_first_name: String,
    pub legal_last_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: chrono::NaiveDate,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub postal_code: Option<String>,
    pub id_document_front_url: Option<String>,
    pub id_document_back_url: Option<String>,
    pub selfie_url: Option<String>,
}

fn default_country() -> String {
    "Nigeria".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KycStatusResponse {
    pub status: String,
    pub rejection_reason: Option<String>,
    pub provisioning_error: Option<String>,
    pub submitted_at: String,
    pub reviewed_at: Option<String>,
}

/// POST /kyc — 提交 / 重新提交
pub async fn submit_kyc(
    auth: AuthUser,
    kyc: web::Data<Arc<KycService>>,
    body: web::Json<KycSubmitBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if !ID_TYPES.contains(&body.id_type.as_str()) {
        return Ok(error_from_vinaji(&VinajiError::validation(format!(
            "证件类型无效: {}",
            body.id_type
        ))));
    }

    let submission = KycSubmission {
        id_type: body.id_type,
        id_number: body.id_number,
        legal_first_name: body.legal_first_name,
        legal_last_name: body.legal_last_name,
        date_of_birth: body.date_of_birth,
        address: body.address,
        city: body.city,
        state: body.state,
        country: body.country,
        postal_code: body.postal_code,
        id_document_front_url: body.id_document_front_url,
        id_document_back_url: body.id_document_back_url,
        selfie_url: body.selfie_url,
    };

    match kyc.submit(auth.id, submission).await {
        Ok(model) => Ok(success_response(KycStatusResponse {
            status: model.status,
            rejection_reason: model.rejection_reason,
            provisioning_error: model.provisioning_error,
            submitted_at: model.submitted_at.to_rfc3339(),
            reviewed_at: model.reviewed_at.map(|dt| dt.to_rfc3339()),
        })),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /kyc — 当前状态
pub async fn kyc_status(
    auth: AuthUser,
    kyc: web::Data<Arc<KycService>>,
) -> ActixResult<impl Responder> {
    match kyc.status_of(auth.id).await {
        Ok(Some(model)) => Ok(success_response(KycStatusResponse {
            status: model.status,
            rejection_reason: model.rejection_reason,
            provisioning_error: model.provisioning_error,
            submitted_at: model.submitted_at.to_rfc3339(),
            reviewed_at: model.reviewed_at.map(|dt| dt.to_rfc3339()),
        })),
        Ok(None) => Ok(error_from_vinaji(&VinajiError::not_found(
            "尚未提交 KYC",
        ))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /kyc/virtual-accounts
pub async fn list_virtual_accounts(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_virtual_accounts(auth.id).await {
        Ok(accounts) => {
            let data: Vec<VirtualAccountResponse> = accounts
                .into_iter()
                .map(VirtualAccountResponse::from)
                .collect();
            Ok(success_response(data))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /kyc/virtual-accounts/{id}/primary
pub async fn set_primary_account(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match storage
        .set_primary_virtual_account(auth.id, path.into_inner())
        .await
    {
        Ok(()) => Ok(success_response(MessageResponse::new("Primary account updated"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /kyc/virtual-accounts/{id}/toggle
pub async fn toggle_account(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match storage.toggle_virtual_account(auth.id, path.into_inner()).await {
        Ok(active) => Ok(success_response(serde_json::json!({ "is_active": active }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /kyc/banks — 可选银行列表
pub async fn list_banks(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_provider_banks().await {
        Ok(banks) => Ok(success_response(banks)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /kyc/bank-preferences
pub async fn list_bank_preferences(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_bank_preferences(auth.id).await {
        Ok(prefs) => Ok(success_response(prefs)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BankPreferenceBody {
    pub bank_code: String,
}

/// POST /kyc/bank-preferences
pub async fn add_bank_preference(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<BankPreferenceBody>,
) -> ActixResult<impl Responder> {
    match storage
        .add_bank_preference(auth.id, body.bank_code.clone())
        .await
    {
        Ok(pref) => Ok(success_response(pref)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
