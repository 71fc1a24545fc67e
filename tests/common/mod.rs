//! Shared test fixtures: tempfile-backed SQLite storage and data factories.

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use vinaji::config::DatabaseConfig;
use vinaji::services::RegisterRequest;
use vinaji::storage::backend::wallet::{self, NewTransaction};
use vinaji::storage::{SeaOrmStorage, TxKind};

use migration::entities::user;

/// Create a storage instance over a fresh temporary SQLite database.
///
/// The TempDir must be kept alive for the duration of the test.
pub async fn test_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("test.db");

    let config = DatabaseConfig {
        database_url: format!("sqlite://{}", db_path.display()),
        pool_size: 5,
        retry_count: 2,
        retry_base_delay_ms: 10,
        retry_max_delay_ms: 50,
    };

    let storage = SeaOrmStorage::new(&config).await.expect("storage init");
    (Arc::new(storage), dir)
}

/// Register a user through the account service.
pub async fn create_user(
    storage: &Arc<SeaOrmStorage>,
    username: &str,
    referral_code: Option<String>,
) -> user::Model {
    let accounts = vinaji::services::AccountService::new(storage.clone());
    accounts
        .register(RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct-horse-battery".to_string(),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            referral_code,
        })
        .await
        .expect("register user")
}

/// Complete a user's profile so they can post listings.
pub async fn complete_profile(storage: &Arc<SeaOrmStorage>, user_id: i64) {
    storage
        .update_profile(
            user_id,
            Some("A bio long enough".to_string()),
            Some("Nigeria".to_string()),
            Some("+2348000000000".to_string()),
            None,
        )
        .await
        .expect("complete profile");
}

/// Credit a wallet directly with a completed deposit row.
pub async fn fund_wallet(storage: &Arc<SeaOrmStorage>, user_id: i64, amount: Decimal) {
    wallet::insert_tx(
        storage.get_db(),
        NewTransaction::completed(user_id, TxKind::Deposit, amount, "NGN", "Test funding"),
    )
    .await
    .expect("fund wallet");
}

/// Create an active category of the given type.
pub async fn create_category(
    storage: &Arc<SeaOrmStorage>,
    name: &str,
    category_type: &str,
) -> i64 {
    storage
        .create_category(name.to_string(), category_type.to_string(), None)
        .await
        .expect("create category")
        .id
}
