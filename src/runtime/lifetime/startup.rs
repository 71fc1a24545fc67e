use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::get_config;
use crate::services::{
    AccountService, BankingProvider, CatalogService, KycService, LedgerService, MonnifyClient,
    SubscriptionService,
};
use crate::storage::SeaOrmStorage;

/// 服务器启动上下文：存储与各业务服务
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub ledger: Arc<LedgerService>,
    pub kyc: Arc<KycService>,
    pub catalog: Arc<CatalogService>,
    pub accounts: Arc<AccountService>,
    pub subscriptions: Arc<SubscriptionService>,
}

/// 准备服务器启动的上下文
/// 包括存储、站点设置与服务装配
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let storage = Arc::new(
        SeaOrmStorage::new(&config.database)
            .await
            .context("Failed to create storage backend")?,
    );
    info!("Using storage backend: {}", storage.backend_name());

    // 确保设置单行存在（顺便预热缓存）
    let settings = storage
        .site_settings()
        .await
        .context("Failed to load site settings")?;
    debug!("Site settings loaded: currency={}", settings.currency);

    // 支付服务商未配置时开户流程禁用，其余功能不受影响
    let provider: Option<Arc<dyn BankingProvider>> = if config.provider.is_configured() {
        match MonnifyClient::new(&config.provider) {
            Ok(client) => {
                info!("Payment provider client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("Payment provider init failed, provisioning disabled: {}", e);
                None
            }
        }
    } else {
        warn!("Payment provider not configured, provisioning disabled");
        None
    };

    let ledger = Arc::new(LedgerService::new(storage.clone()));
    let kyc = Arc::new(KycService::new(storage.clone(), provider));
    let catalog = Arc::new(CatalogService::new(storage.clone()));
    let accounts = Arc::new(AccountService::new(storage.clone()));
    let subscriptions = Arc::new(SubscriptionService::new(storage.clone()));

    info!(
        "Startup preparation finished in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        ledger,
        kyc,
        catalog,
        accounts,
        subscriptions,
    })
}
