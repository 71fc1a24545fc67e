//! Admin-facing platform statistics (SQL aggregates).

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect};
use serde::Serialize;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::TxKind;

use migration::entities::{course, job, kyc_verification, product, transaction, user};

#[derive(Debug, FromQueryResult)]
struct VolumeRow {
    total: Option<Decimal>,
}

/// 平台总览
#[derive(Debug, Clone, Serialize, Default)]
pub struct PlatformStats {
    pub total_users: u64,
    pub pending_kyc: u64,
    pub pending_jobs: u64,
    pub pending_courses: u64,
    pub pending_products: u64,
    pub pending_withdrawals: u64,
    /// 已完成贷方流水总额（平台经手资金量）
    pub completed_credit_volume: Decimal,
    pub completed_transactions: u64,
}

impl SeaOrmStorage {
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let db = self.get_db();

        let total_users = user::Entity::find().count(db).await?;

        let pending_kyc = kyc_verification::Entity::find()
            .filter(kyc_verification::Column::Status.eq("pending"))
            .count(db)
            .await?;

        let pending_jobs = job::Entity::find()
            .filter(job::Column::Status.eq("pending"))
            .count(db)
            .await?;

        let pending_courses = course::Entity::find()
            .filter(course::Column::Status.eq("pending"))
            .count(db)
            .await?;

        let pending_products = product::Entity::find()
            .filter(product::Column::Status.eq("pending"))
            .count(db)
            .await?;

        let pending_withdrawals = transaction::Entity::find()
            .filter(transaction::Column::Kind.eq("withdrawal"))
            .filter(transaction::Column::Status.eq("pending"))
            .count(db)
            .await?;

        let completed_transactions = transaction::Entity::find()
            .filter(transaction::Column::Status.eq("completed"))
            .count(db)
            .await?;

        let volume = transaction::Entity::find()
            .select_only()
            .column_as(transaction::Column::Amount.sum(), "total")
            .filter(transaction::Column::Kind.is_in(TxKind::credit_kinds()))
            .filter(transaction::Column::Status.eq("completed"))
            .into_model::<VolumeRow>()
            .one(db)
            .await?;

        Ok(PlatformStats {
            total_users,
            pending_kyc,
            pending_jobs,
            pending_courses,
            pending_products,
            pending_withdrawals,
            completed_credit_volume: volume.and_then(|v| v.total).unwrap_or(Decimal::ZERO),
            completed_transactions,
        })
    }
}
