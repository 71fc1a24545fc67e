//! Registration, login and password reset tests.

mod common;

use rust_decimal_macros::dec;

use common::{create_user, test_storage};
use vinaji::services::{AccountService, LedgerService, RegisterRequest};
use vinaji::storage::backend::settings::SettingsPatch;

fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "correct-horse-battery".to_string(),
        first_name: None,
        last_name: None,
        referral_code: None,
    }
}

#[tokio::test]
async fn test_register_creates_profile_and_referral_code() {
    let (storage, _dir) = test_storage().await;
    let accounts = AccountService::new(storage.clone());

    let user = accounts.register(register_request("ada")).await.unwrap();

    assert_eq!(user.referral_code.len(), 8);
    assert_eq!(user.subscription_level, "starter");
    assert!(!user.is_staff);

    let profile = storage.get_profile(user.id).await.unwrap();
    assert!(profile.is_some());
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_weak_input() {
    let (storage, _dir) = test_storage().await;
    let accounts = AccountService::new(storage.clone());

    accounts.register(register_request("taken")).await.unwrap();

    // 重名
    assert!(accounts.register(register_request("taken")).await.is_err());

    // 重复邮箱
    let mut request = register_request("other");
    request.email = "taken@example.com".to_string();
    assert!(accounts.register(request).await.is_err());

    // 弱密码
    let mut request = register_request("weakpw");
    request.password = "short".to_string();
    assert!(accounts.register(request).await.is_err());

    // 坏邮箱
    let mut request = register_request("bademail");
    request.email = "not-an-email".to_string();
    assert!(accounts.register(request).await.is_err());
}

#[tokio::test]
async fn test_referral_links_users_and_pays_signup_reward() {
    let (storage, _dir) = test_storage().await;

    storage
        .update_site_settings(SettingsPatch {
            referral_signup_reward: Some(dec!(200)),
            ..Default::default()
        })
        .await
        .unwrap();

    let referrer = create_user(&storage, "sponsor", None).await;
    let referred = create_user(&storage, "invitee", Some(referrer.referral_code.clone())).await;

    let referral = storage
        .find_referral_by_referred(referred.id)
        .await
        .unwrap()
        .expect("referral row");
    assert_eq!(referral.referrer_id, referrer.id);

    // 注册奖励入账
    let ledger = LedgerService::new(storage.clone());
    assert_eq!(
        ledger.balance(referrer.id).await.unwrap().available,
        dec!(200)
    );
}

#[tokio::test]
async fn test_register_rejects_unknown_referral_code() {
    let (storage, _dir) = test_storage().await;
    let accounts = AccountService::new(storage.clone());

    let mut request = register_request("lost");
    request.referral_code = Some("NOPE1234".to_string());
    assert!(accounts.register(request).await.is_err());
}

#[tokio::test]
async fn test_authenticate_accepts_username_or_email() {
    let (storage, _dir) = test_storage().await;
    let accounts = AccountService::new(storage.clone());
    create_user(&storage, "login_user", None).await;

    assert!(
        accounts
            .authenticate("login_user", "correct-horse-battery")
            .await
            .is_ok()
    );
    assert!(
        accounts
            .authenticate("login_user@example.com", "correct-horse-battery")
            .await
            .is_ok()
    );
    assert!(accounts.authenticate("login_user", "wrong").await.is_err());
    assert!(accounts.authenticate("ghost", "whatever").await.is_err());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (storage, _dir) = test_storage().await;
    let accounts = AccountService::new(storage.clone());
    create_user(&storage, "forgetful", None).await;

    let token = accounts
        .request_password_reset("forgetful@example.com")
        .await
        .unwrap()
        .expect("token issued");

    accounts
        .reset_password(token, "brand-new-password")
        .await
        .unwrap();

    // 新密码生效，旧密码失效
    assert!(
        accounts
            .authenticate("forgetful", "brand-new-password")
            .await
            .is_ok()
    );
    assert!(
        accounts
            .authenticate("forgetful", "correct-horse-battery")
            .await
            .is_err()
    );

    // 令牌单次使用
    assert!(accounts.reset_password(token, "another-password").await.is_err());
}

#[tokio::test]
async fn test_password_reset_unknown_email_is_silent() {
    let (storage, _dir) = test_storage().await;
    let accounts = AccountService::new(storage.clone());

    let token = accounts
        .request_password_reset("ghost@example.com")
        .await
        .unwrap();
    assert!(token.is_none());
}
