use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category_id: i64,
    /// beginner | intermediate | advanced
    pub level: String,
    pub instructor_id: i64,
    /// Duration in hours
    pub duration: i32,
    /// online | offline | hybrid
    pub mode: String,
    pub start_date: DateTimeUtc,
    pub is_self_paced: bool,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub spots_total: i32,
    pub spots_left: i32,
    pub preview_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// draft | pending | approved | rejected
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
