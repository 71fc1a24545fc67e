//! KYC verification entity, one row per user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "kyc_verifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    /// pending | approved | rejected | needs_revision
    pub status: String,
    /// bvn | nin | drivers_license | international_passport
    pub id_type: String,
    pub id_number: String,
    pub legal_first_name: String,
    pub legal_last_name: String,
    pub date_of_birth: Date,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub id_document_front_url: Option<String>,
    pub id_document_back_url: Option<String>,
    pub selfie_url: Option<String>,
    /// Reference sent to the payment provider; generated once, reused on retry
    pub provider_customer_reference: Option<String>,
    /// Last provisioning failure, cleared on success
    #[sea_orm(column_type = "Text", nullable)]
    pub provisioning_error: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTimeUtc,
    pub reviewed_at: Option<DateTimeUtc>,
    pub reviewed_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
