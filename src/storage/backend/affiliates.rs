//! Referral and affiliate commission storage operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::SeaOrmStorage;
use crate::errors::{Result, VinajiError};

use migration::entities::{affiliate_sale, referral};

impl SeaOrmStorage {
    pub async fn insert_referral(
        &self,
        referrer_id: i64,
        referred_user_id: i64,
    ) -> Result<referral::Model> {
        if referrer_id == referred_user_id {
            return Err(VinajiError::validation("不能推荐自己"));
        }
        Ok(referral::ActiveModel {
            referrer_id: Set(referrer_id),
            referred_user_id: Set(referred_user_id),
            joined_at: Set(Utc::now()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// 买家对应的推荐关系（佣金分配入口）
    pub async fn find_referral_by_referred(
        &self,
        referred_user_id: i64,
    ) -> Result<Option<referral::Model>> {
        Ok(referral::Entity::find()
            .filter(referral::Column::ReferredUserId.eq(referred_user_id))
            .filter(referral::Column::IsActive.eq(true))
            .one(&self.db)
            .await?)
    }

    pub async fn list_referrals_of(&self, referrer_id: i64) -> Result<Vec<referral::Model>> {
        Ok(referral::Entity::find()
            .filter(referral::Column::ReferrerId.eq(referrer_id))
            .order_by_desc(referral::Column::JoinedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn find_affiliate_sale(&self, id: i64) -> Result<Option<affiliate_sale::Model>> {
        Ok(affiliate_sale::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// 推荐人视角的佣金记录
    pub async fn list_affiliate_sales_of(
        &self,
        referrer_id: i64,
    ) -> Result<Vec<affiliate_sale::Model>> {
        let referral_ids: Vec<i64> = referral::Entity::find()
            .filter(referral::Column::ReferrerId.eq(referrer_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        if referral_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(affiliate_sale::Entity::find()
            .filter(affiliate_sale::Column::ReferralId.is_in(referral_ids))
            .order_by_desc(affiliate_sale::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn list_affiliate_sales_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<affiliate_sale::Model>> {
        Ok(affiliate_sale::Entity::find()
            .filter(affiliate_sale::Column::Status.eq(status))
            .order_by_asc(affiliate_sale::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

/// 事务内按被推荐人查推荐关系
pub async fn referral_by_referred<C: ConnectionTrait>(
    conn: &C,
    referred_user_id: i64,
) -> Result<Option<referral::Model>> {
    Ok(referral::Entity::find()
        .filter(referral::Column::ReferredUserId.eq(referred_user_id))
        .filter(referral::Column::IsActive.eq(true))
        .one(conn)
        .await?)
}

/// 事务内登记佣金
pub async fn insert_affiliate_sale<C: ConnectionTrait>(
    conn: &C,
    referral_id: i64,
    transaction_id: i64,
    commission_amount: Decimal,
    commission_rate: Decimal,
    auto_approve: bool,
) -> Result<affiliate_sale::Model> {
    Ok(affiliate_sale::ActiveModel {
        referral_id: Set(referral_id),
        transaction_id: Set(transaction_id),
        commission_amount: Set(commission_amount),
        commission_rate: Set(commission_rate),
        status: Set(if auto_approve { "approved" } else { "pending" }.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

/// 事务内更新佣金状态（标记已打款时写 paid_at）
pub async fn set_affiliate_sale_status<C: ConnectionTrait>(
    conn: &C,
    sale: affiliate_sale::Model,
    status: &str,
) -> Result<affiliate_sale::Model> {
    let mut active: affiliate_sale::ActiveModel = sale.into();
    active.status = Set(status.to_string());
    if status == "paid" {
        active.paid_at = Set(Some(Utc::now()));
    }
    Ok(active.update(conn).await?)
}
