//! Subscription plan and purchase storage operations.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::SeaOrmStorage;
use crate::errors::{Result, VinajiError};

use migration::entities::{subscription_plan, subscription_purchase};

impl SeaOrmStorage {
    pub async fn list_subscription_plans(&self) -> Result<Vec<subscription_plan::Model>> {
        Ok(subscription_plan::Entity::find()
            .filter(subscription_plan::Column::IsActive.eq(true))
            .order_by_asc(subscription_plan::Column::Price)
            .all(&self.db)
            .await?)
    }

    pub async fn find_subscription_plan(
        &self,
        id: i64,
    ) -> Result<Option<subscription_plan::Model>> {
        Ok(subscription_plan::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn upsert_subscription_plan(
        &self,
        name: String,
        description: Option<String>,
        price: Decimal,
        duration_days: i32,
        features: serde_json::Value,
    ) -> Result<subscription_plan::Model> {
        let now = Utc::now();
        match subscription_plan::Entity::find()
            .filter(subscription_plan::Column::Name.eq(&name))
            .one(&self.db)
            .await?
        {
            Some(existing) => {
                let mut active: subscription_plan::ActiveModel = existing.into();
                active.description = Set(description);
                active.price = Set(price);
                active.duration_days = Set(duration_days);
                active.features = Set(features);
                active.is_active = Set(true);
                active.updated_at = Set(now);
                Ok(active.update(&self.db).await?)
            }
            None => Ok(subscription_plan::ActiveModel {
                name: Set(name),
                description: Set(description),
                price: Set(price),
                duration_days: Set(duration_days),
                features: Set(features),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await?),
        }
    }

    /// 当前仍在有效期内的订阅
    pub async fn active_subscription_of(
        &self,
        user_id: i64,
    ) -> Result<Option<subscription_purchase::Model>> {
        let found = subscription_purchase::Entity::find()
            .filter(subscription_purchase::Column::UserId.eq(user_id))
            .filter(subscription_purchase::Column::Status.eq("active"))
            .order_by_desc(subscription_purchase::Column::PurchasedAt)
            .one(&self.db)
            .await?;

        Ok(found.filter(|s| s.end_date.is_none_or(|end| end > Utc::now())))
    }

    pub async fn expire_subscription(&self, purchase: subscription_purchase::Model) -> Result<()> {
        let mut active: subscription_purchase::ActiveModel = purchase.into();
        active.status = Set("expired".to_string());
        active.update(&self.db).await?;
        Ok(())
    }
}

/// 事务内登记并激活订阅购买
pub async fn insert_subscription_purchase<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    plan: &subscription_plan::Model,
    transaction_id: Option<i64>,
) -> Result<subscription_purchase::Model> {
    let now = Utc::now();
    let end_date = if plan.duration_days > 0 {
        Some(now + Duration::days(plan.duration_days as i64))
    } else {
        None
    };

    Ok(subscription_purchase::ActiveModel {
        user_id: Set(user_id),
        plan_id: Set(plan.id),
        amount_paid: Set(plan.price),
        status: Set("active".to_string()),
        start_date: Set(Some(now)),
        end_date: Set(end_date),
        transaction_id: Set(transaction_id),
        purchased_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

/// 事务内提升用户订阅档位
pub async fn set_subscription_level<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    level: &str,
) -> Result<()> {
    use migration::entities::user;

    let user = user::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| VinajiError::not_found(format!("用户不存在: {}", user_id)))?;
    let mut active: user::ActiveModel = user.into();
    active.subscription_level = Set(level.to_string());
    active.date_updated = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}
