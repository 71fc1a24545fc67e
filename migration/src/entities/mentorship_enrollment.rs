use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "mentorship_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub offer_id: i64,
    pub student_id: i64,
    /// Requested duration in hours
    pub requested_hours: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub admin_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_amount: Decimal,
    /// pending | active | completed | cancelled
    pub status: String,
    #[sea_orm(unique)]
    pub tracking_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub application_message: Option<String>,
    pub enrolled_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
