use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "course_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub final_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub admin_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_amount: Decimal,
    /// pending | active | completed | cancelled
    pub status: String,
    pub promo_code_id: Option<i64>,
    pub enrolled_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
