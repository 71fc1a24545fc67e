use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category_id: i64,
    /// full_time | part_time | contract | freelance | internship
    pub job_type: String,
    pub location: String,
    pub company_name: String,
    pub company_logo_url: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub salary_min: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub salary_max: Decimal,
    pub deadline: DateTimeUtc,
    pub spots_total: i32,
    pub spots_left: i32,
    /// entry | mid | senior | executive
    pub level_requirement: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub posted_by: i64,
    /// draft | pending | approved | rejected
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub views_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
