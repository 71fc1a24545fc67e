//! Subscription purchase and effective-level resolution.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::TransactionTrait;
use serde_json::json;
use tracing::info;

use crate::errors::{Result, VinajiError};
use crate::storage::backend::subscriptions::{insert_subscription_purchase, set_subscription_level};
use crate::storage::backend::wallet::{self, NewTransaction};
use crate::storage::backend::notifications;
use crate::storage::{SeaOrmStorage, SubscriptionLevel, TxKind};

use migration::entities::{subscription_purchase, user};

pub struct SubscriptionService {
    storage: Arc<SeaOrmStorage>,
}

impl SubscriptionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 钱包扣款购买订阅并立即激活；借记、订阅记录、档位提升同一事务。
    pub async fn purchase_plan(
        &self,
        user_id: i64,
        plan_id: i64,
    ) -> Result<subscription_purchase::Model> {
        let plan = self
            .storage
            .find_subscription_plan(plan_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| VinajiError::not_found(format!("订阅方案不存在: {}", plan_id)))?;

        // 方案名必须是合法档位
        let level: SubscriptionLevel = plan
            .name
            .parse()
            .map_err(|_| VinajiError::validation(format!("订阅方案名无效: {}", plan.name)))?;

        let settings = self.storage.site_settings().await?;
        let currency = settings.currency.clone();

        let txn = self.storage.get_db().begin().await?;

        let tx = if plan.price > Decimal::ZERO {
            let balance = wallet::balance_of(&txn, user_id).await?;
            if balance.available < plan.price {
                return Err(VinajiError::insufficient_balance(format!(
                    "余额不足：需要 {}，可用 {}",
                    plan.price, balance.available
                )));
            }

            Some(
                wallet::insert_tx(
                    &txn,
                    NewTransaction::completed(
                        user_id,
                        TxKind::Purchase,
                        plan.price,
                        &currency,
                        format!("Subscription purchase: {}", plan.name),
                    )
                    .with_metadata(json!({ "plan_id": plan.id })),
                )
                .await?,
            )
        } else {
            None
        };

        let purchase =
            insert_subscription_purchase(&txn, user_id, &plan, tx.map(|t| t.id)).await?;
        set_subscription_level(&txn, user_id, level.as_ref()).await?;

        notifications::insert_notification(
            &txn,
            user_id,
            "system",
            "Subscription Activated",
            format!("Your {} subscription is now active.", plan.name),
            Some((purchase.id, "subscription")),
        )
        .await?;

        txn.commit().await?;
        info!("User {} subscribed to plan {}", user_id, plan.name);
        Ok(purchase)
    }

    /// 实际生效的订阅档位：有效订阅在期 → 方案档位，否则回落 starter
    pub async fn effective_level(&self, user: &user::Model) -> Result<SubscriptionLevel> {
        match self.storage.active_subscription_of(user.id).await? {
            Some(active) => {
                let plan = self
                    .storage
                    .find_subscription_plan(active.plan_id)
                    .await?
                    .ok_or_else(|| {
                        VinajiError::not_found(format!("订阅方案不存在: {}", active.plan_id))
                    })?;
                Ok(plan.name.parse().unwrap_or_default())
            }
            None => {
                // 订阅到期后用户档位字段回落
                let stored: SubscriptionLevel =
                    user.subscription_level.parse().unwrap_or_default();
                if stored != SubscriptionLevel::Starter {
                    self.storage
                        .set_user_subscription_level(user.id, SubscriptionLevel::Starter.as_ref())
                        .await?;
                }
                Ok(SubscriptionLevel::Starter)
            }
        }
    }
}
