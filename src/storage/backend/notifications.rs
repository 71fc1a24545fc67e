//! Notification storage operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::SeaOrmStorage;
use crate::errors::{Result, VinajiError};

use migration::entities::notification;

impl SeaOrmStorage {
    pub async fn list_notifications(
        &self,
        user_id: i64,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<notification::Model>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        let find = notification::Entity::find().filter(notification::Column::UserId.eq(user_id));

        let total = find.clone().count(&self.db).await?;
        let rows = find
            .order_by_desc(notification::Column::CreatedAt)
            .paginate(&self.db, page_size)
            .fetch_page(page - 1)
            .await?;

        Ok((rows, total))
    }

    pub async fn unread_notification_count(&self, user_id: i64) -> Result<u64> {
        Ok(notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await?)
    }

    pub async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<()> {
        let found = notification::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| VinajiError::not_found(format!("通知不存在: {}", id)))?;

        let mut active: notification::ActiveModel = found.into();
        active.is_read = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        let unread = notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .all(&self.db)
            .await?;

        let count = unread.len() as u64;
        for item in unread {
            let mut active: notification::ActiveModel = item.into();
            active.is_read = Set(true);
            active.update(&self.db).await?;
        }
        Ok(count)
    }
}

/// 插入通知；账本流程在事务内调用
pub async fn insert_notification<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    kind: &str,
    title: impl Into<String>,
    message: impl Into<String>,
    related: Option<(i64, &str)>,
) -> Result<notification::Model> {
    Ok(notification::ActiveModel {
        user_id: Set(user_id),
        kind: Set(kind.to_string()),
        title: Set(title.into()),
        message: Set(message.into()),
        is_read: Set(false),
        related_object_id: Set(related.map(|(id, _)| id)),
        related_object_type: Set(related.map(|(_, t)| t.to_string())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}
