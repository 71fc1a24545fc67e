//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

pub mod affiliates;
pub mod catalog;
mod connection;
pub mod kyc;
pub mod notifications;
pub mod retry;
pub mod settings;
mod stats;
pub mod subscriptions;
pub mod users;
pub mod wallet;

use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, VinajiError};

pub use stats::PlatformStats;
pub use wallet::NewTransaction;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(VinajiError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 交易流水过滤条件
#[derive(Default, Clone, Debug)]
pub struct TransactionFilter {
    pub kind: Option<String>,
    pub status: Option<String>,
    /// 创建时间 >= created_after
    pub created_after: Option<DateTime<Utc>>,
    /// 创建时间 <= created_before
    pub created_before: Option<DateTime<Utc>>,
}

/// 列表类内容的通用查询条件（职位/课程/商品/导师/博客）
#[derive(Default, Clone, Debug)]
pub struct ListingQuery {
    /// None = 仅已上架（approved）
    pub status: Option<String>,
    pub category_id: Option<i64>,
    /// 模糊匹配 title 或 description
    pub search: Option<String>,
    /// 职位类型 / 课程难度 / 授权类型等子类过滤
    pub variant: Option<String>,
    /// 只看某个用户发布的
    pub owner_id: Option<i64>,
    pub page: u64,
    pub page_size: u64,
}

impl ListingQuery {
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, 100);
        self
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 分页 COUNT 缓存（TTL 30秒）
    count_cache: Cache<String, u64>,
    /// 站点设置缓存（TTL 60秒）
    settings_cache: Cache<(), migration::entities::site_setting::Model>,
    /// 重试配置
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = &config.database_url;
        if database_url.is_empty() {
            return Err(VinajiError::database_config("DATABASE_URL 未设置".to_string()));
        }

        let backend_name = infer_backend_from_url(database_url)?;

        let retry_config = retry::RetryConfig {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        };

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connection::connect_sqlite(database_url).await?
        } else {
            connection::connect_generic(database_url, &backend_name, config.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name,
            count_cache: Cache::builder()
                .time_to_live(Duration::from_secs(30))
                .max_capacity(200)
                .build(),
            settings_cache: Cache::builder()
                .time_to_live(Duration::from_secs(60))
                .max_capacity(1)
                .build(),
            retry_config,
        };

        // 运行迁移
        connection::run_migrations(&storage.db).await?;

        warn!("{} Storage initialized.", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（事务编排等需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(crate) fn retry_config(&self) -> retry::RetryConfig {
        self.retry_config
    }

    pub(crate) fn count_cache(&self) -> &Cache<String, u64> {
        &self.count_cache
    }

    pub(crate) fn invalidate_count_cache(&self) {
        self.count_cache.invalidate_all();
    }

    pub(crate) fn settings_cache(
        &self,
    ) -> &Cache<(), migration::entities::site_setting::Model> {
        &self.settings_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mysql://u@h/db").unwrap(), "mysql");
        assert_eq!(
            infer_backend_from_url("postgres://u@h/db").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("redis://h").is_err());
    }

    #[test]
    fn test_listing_query_normalization() {
        let query = ListingQuery {
            page: 0,
            page_size: 10_000,
            ..Default::default()
        }
        .normalized();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 100);
    }
}
