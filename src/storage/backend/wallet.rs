//! Ledger storage operations.
//!
//! Balance is never stored; it is derived here by SQL summation over
//! transaction rows. The free functions take any `ConnectionTrait` so the
//! service layer can run them inside a database transaction together with
//! the writes they guard.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::{SeaOrmStorage, TransactionFilter, retry};
use crate::errors::{Result, VinajiError};
use crate::storage::models::{BalanceSummary, TxKind, TxStatus};
use crate::utils::generate_reference;

use migration::entities::{manual_deposit, transaction};

#[derive(Debug, FromQueryResult)]
struct SumRow {
    total: Option<Decimal>,
}

/// 新流水参数
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub kind: TxKind,
    pub amount: Decimal,
    pub currency: String,
    pub status: TxStatus,
    /// None 时自动生成
    pub reference: Option<String>,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

impl NewTransaction {
    pub fn completed(
        user_id: i64,
        kind: TxKind,
        amount: Decimal,
        currency: &str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount,
            currency: currency.to_string(),
            status: TxStatus::Completed,
            reference: None,
            description: description.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// 插入一条流水（可在事务内调用）
pub async fn insert_tx<C: ConnectionTrait>(
    conn: &C,
    new: NewTransaction,
) -> Result<transaction::Model> {
    let now = Utc::now();
    let completed = new.status == TxStatus::Completed;

    let model = transaction::ActiveModel {
        user_id: Set(new.user_id),
        kind: Set(new.kind.to_string()),
        amount: Set(new.amount),
        currency: Set(new.currency),
        status: Set(new.status.to_string()),
        reference: Set(new.reference.unwrap_or_else(|| generate_reference("TX"))),
        description: Set(new.description),
        metadata: Set(new.metadata),
        created_at: Set(now),
        updated_at: Set(now),
        completed_at: Set(completed.then_some(now)),
        ..Default::default()
    };

    Ok(model.insert(conn).await?)
}

/// 事务内按引用查流水（幂等去重）
pub async fn tx_by_reference<C: ConnectionTrait>(
    conn: &C,
    reference: &str,
) -> Result<Option<transaction::Model>> {
    Ok(transaction::Entity::find()
        .filter(transaction::Column::Reference.eq(reference))
        .one(conn)
        .await?)
}

async fn sum_filtered<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    kinds: &[&str],
    statuses: &[&str],
) -> Result<Decimal> {
    let row = transaction::Entity::find()
        .select_only()
        .column_as(transaction::Column::Amount.sum(), "total")
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Kind.is_in(kinds.iter().copied()))
        .filter(transaction::Column::Status.is_in(statuses.iter().copied()))
        .into_model::<SumRow>()
        .one(conn)
        .await?;

    Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
}

/// 余额汇总：已完成贷方 − 已完成借方 − 待处理借方（提现冻结）
pub async fn balance_of<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<BalanceSummary> {
    let credits = sum_filtered(conn, user_id, &TxKind::credit_kinds(), &["completed"]).await?;
    let debits = sum_filtered(conn, user_id, &TxKind::debit_kinds(), &["completed"]).await?;
    let pending_debits =
        sum_filtered(conn, user_id, &TxKind::debit_kinds(), &["pending"]).await?;

    Ok(BalanceSummary {
        available: credits - debits - pending_debits,
        total_credits: credits,
        total_debits: debits,
        pending_debits,
    })
}

impl SeaOrmStorage {
    pub async fn balance(&self, user_id: i64) -> Result<BalanceSummary> {
        balance_of(&self.db, user_id).await
    }

    pub async fn find_tx(&self, id: i64) -> Result<Option<transaction::Model>> {
        Ok(transaction::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_tx_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<transaction::Model>> {
        Ok(transaction::Entity::find()
            .filter(transaction::Column::Reference.eq(reference))
            .one(&self.db)
            .await?)
    }

    /// 带过滤条件的分页流水（带 COUNT 缓存）
    pub async fn list_transactions(
        &self,
        user_id: i64,
        filter: TransactionFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<transaction::Model>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        let mut query = transaction::Entity::find().filter(transaction::Column::UserId.eq(user_id));

        if let Some(ref kind) = filter.kind {
            query = query.filter(transaction::Column::Kind.eq(kind));
        }
        if let Some(ref status) = filter.status {
            query = query.filter(transaction::Column::Status.eq(status));
        }
        if let Some(after) = filter.created_after {
            query = query.filter(transaction::Column::CreatedAt.gte(after));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(transaction::Column::CreatedAt.lte(before));
        }

        // 生成缓存 key（基于过滤条件）
        let cache_key = format!(
            "tx:{}:k={:?}:s={:?}:a={:?}:b={:?}",
            user_id,
            filter.kind,
            filter.status,
            filter.created_after.map(|d| d.timestamp()),
            filter.created_before.map(|d| d.timestamp()),
        );

        let total = if let Some(cached) = self.count_cache().get(&cache_key) {
            cached
        } else {
            let count = query.clone().count(&self.db).await?;
            self.count_cache().insert(cache_key, count);
            count
        };

        let rows = query
            .order_by_desc(transaction::Column::CreatedAt)
            .paginate(&self.db, page_size)
            .fetch_page(page - 1)
            .await?;

        Ok((rows, total))
    }

    /// 更新流水状态（提现审批等）
    pub async fn update_tx_status(&self, id: i64, status: TxStatus) -> Result<transaction::Model> {
        let tx = transaction::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("流水不存在: {}", id)))?;

        let now = Utc::now();
        let mut active: transaction::ActiveModel = tx.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(now);
        if status == TxStatus::Completed {
            active.completed_at = Set(Some(now));
        }

        let updated = active.update(&self.db).await?;
        self.invalidate_count_cache();
        info!("Transaction {} -> {}", id, status);
        Ok(updated)
    }

    /// 管理端：待审批提现列表
    pub async fn list_pending_withdrawals(&self) -> Result<Vec<transaction::Model>> {
        Ok(transaction::Entity::find()
            .filter(transaction::Column::Kind.eq(TxKind::Withdrawal.to_string()))
            .filter(transaction::Column::Status.eq(TxStatus::Pending.to_string()))
            .order_by_asc(transaction::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    // ============ 手动入账 ============

    pub async fn create_manual_deposit(
        &self,
        user_id: i64,
        amount: Decimal,
        depositor_name: String,
        deposit_date: chrono::NaiveDate,
        proof_url: Option<String>,
    ) -> Result<manual_deposit::Model> {
        let db = &self.db;
        let model = manual_deposit::ActiveModel {
            user_id: Set(user_id),
            amount: Set(amount),
            depositor_name: Set(depositor_name),
            deposit_date: Set(deposit_date),
            proof_url: Set(proof_url),
            status: Set("pending".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = retry::with_retry(
            "create_manual_deposit",
            self.retry_config(),
            || async { model.clone().insert(db).await },
        )
        .await
        .map_err(|e| VinajiError::database_operation(format!("手动入账提交失败: {}", e)))?;

        Ok(created)
    }

    pub async fn find_manual_deposit(&self, id: i64) -> Result<Option<manual_deposit::Model>> {
        Ok(manual_deposit::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_manual_deposits(
        &self,
        user_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<Vec<manual_deposit::Model>> {
        let mut query = manual_deposit::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(manual_deposit::Column::UserId.eq(user_id));
        }
        if let Some(status) = status {
            query = query.filter(manual_deposit::Column::Status.eq(status));
        }
        Ok(query
            .order_by_desc(manual_deposit::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

/// 事务内更新手动入账状态
pub async fn set_manual_deposit_status<C: ConnectionTrait>(
    conn: &C,
    deposit: manual_deposit::Model,
    status: &str,
    reviewer: i64,
    notes: Option<String>,
) -> Result<manual_deposit::Model> {
    let mut active: manual_deposit::ActiveModel = deposit.into();
    active.status = Set(status.to_string());
    active.reviewed_by = Set(Some(reviewer));
    active.reviewed_at = Set(Some(Utc::now()));
    if notes.is_some() {
        active.admin_notes = Set(notes);
    }
    Ok(active.update(conn).await?)
}
