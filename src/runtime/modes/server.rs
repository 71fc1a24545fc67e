//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::Compress,
    web,
};
use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, RequireAuth};
use crate::api::services::{
    AppStartTime, admin::routes::admin_v1_routes, affiliates, auth, blog, courses, health, jobs,
    kyc, mentorship, notifications, products, profile, subscriptions, wallet, webhook,
};
use crate::config::get_config;
use crate::runtime::lifetime::{StartupContext, prepare_server_startup, shutdown_cleanup};

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config() {
    let server = &get_config().server;
    if server.cors_enabled && server.cors_allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware() -> Cors {
    let server = &get_config().server;

    // When CORS is disabled, use browser's default same-origin policy (restrictive)
    if !server.cors_enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(["Content-Type", "Authorization", "Accept"])
        .max_age(3600);

    if server.cors_allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &server.cors_allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// 认证相关路由 `/auth`
fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route(
            "/register",
            web::post().to(auth::register).wrap(auth::login_rate_limiter()),
        )
        .route(
            "/login",
            web::post().to(auth::login).wrap(auth::login_rate_limiter()),
        )
        .route("/refresh", web::post().to(auth::refresh_token))
        .route("/logout", web::post().to(auth::logout))
        .route("/verify", web::get().to(auth::verify_token))
        .route("/password-reset", web::post().to(auth::request_password_reset))
        .route(
            "/password-reset/confirm",
            web::post().to(auth::confirm_password_reset),
        )
}

/// 档案路由 `/profile`
fn profile_routes() -> actix_web::Scope {
    web::scope("/profile")
        .route("", web::get().to(profile::get_profile))
        .route("", web::put().to(profile::update_profile))
        .route("/bank-accounts", web::get().to(profile::list_bank_accounts))
        .route("/bank-accounts", web::post().to(profile::add_bank_account))
        .route(
            "/bank-accounts/{id}",
            web::delete().to(profile::remove_bank_account),
        )
        .route("/crypto-wallets", web::get().to(profile::list_crypto_wallets))
        .route("/crypto-wallets", web::post().to(profile::add_crypto_wallet))
        .route(
            "/crypto-wallets/{id}",
            web::delete().to(profile::remove_crypto_wallet),
        )
}

/// 钱包路由 `/wallet`
fn wallet_routes() -> actix_web::Scope {
    web::scope("/wallet")
        .route("/balance", web::get().to(wallet::get_balance))
        .route("/transactions", web::get().to(wallet::list_transactions))
        .route("/deposit-details", web::get().to(wallet::deposit_details))
        .route("/deposits/manual", web::get().to(wallet::list_manual_deposits))
        .route("/deposits/manual", web::post().to(wallet::submit_manual_deposit))
        .route("/withdrawals", web::post().to(wallet::request_withdrawal))
        .route("/transfers", web::post().to(wallet::transfer))
        .route("/fees", web::get().to(wallet::fee_schedule))
}

/// KYC 路由 `/kyc`
fn kyc_routes() -> actix_web::Scope {
    web::scope("/kyc")
        .route("", web::get().to(kyc::kyc_status))
        .route("", web::post().to(kyc::submit_kyc))
        .route("/banks", web::get().to(kyc::list_banks))
        .route("/bank-preferences", web::get().to(kyc::list_bank_preferences))
        .route("/bank-preferences", web::post().to(kyc::add_bank_preference))
        .route("/virtual-accounts", web::get().to(kyc::list_virtual_accounts))
        .route(
            "/virtual-accounts/{id}/primary",
            web::post().to(kyc::set_primary_account),
        )
        .route(
            "/virtual-accounts/{id}/toggle",
            web::post().to(kyc::toggle_account),
        )
}

/// 职位路由 `/jobs`
fn jobs_routes() -> actix_web::Scope {
    web::scope("/jobs")
        .route("", web::get().to(jobs::list_jobs))
        .route("", web::post().to(jobs::create_job))
        // mine / purchases 必须在 /{id} 之前
        .route("/mine", web::get().to(jobs::my_jobs))
        .route("/purchases", web::get().to(jobs::my_job_purchases))
        .route("/{id}/purchase", web::post().to(jobs::purchase_job))
        .route("/{id}", web::get().to(jobs::get_job))
        .route("/{id}", web::put().to(jobs::update_job))
        .route("/{id}", web::delete().to(jobs::delete_job))
}

/// 课程路由 `/courses`
fn courses_routes() -> actix_web::Scope {
    web::scope("/courses")
        .route("", web::get().to(courses::list_courses))
        .route("", web::post().to(courses::create_course))
        .route("/mine", web::get().to(courses::my_courses))
        .route("/enrollments", web::get().to(courses::my_enrollments))
        .route("/{id}/enroll", web::post().to(courses::enroll_course))
        .route("/{id}", web::get().to(courses::get_course))
        .route("/{id}", web::put().to(courses::update_course))
        .route("/{id}", web::delete().to(courses::delete_course))
}

/// 商品路由 `/products`
fn products_routes() -> actix_web::Scope {
    web::scope("/products")
        .route("", web::get().to(products::list_products))
        .route("", web::post().to(products::create_product))
        .route("/mine", web::get().to(products::my_products))
        .route("/purchases", web::get().to(products::my_product_purchases))
        .route("/{id}/purchase", web::post().to(products::purchase_product))
        .route("/{id}", web::get().to(products::get_product))
        .route("/{id}", web::put().to(products::update_product))
        .route("/{id}", web::delete().to(products::delete_product))
}

/// 导师服务路由 `/mentorship`
fn mentorship_routes() -> actix_web::Scope {
    web::scope("/mentorship")
        .route("", web::get().to(mentorship::list_offers))
        .route("", web::post().to(mentorship::create_offer))
        .route("/mine", web::get().to(mentorship::my_offers))
        .route(
            "/enrollments",
            web::get().to(mentorship::my_mentorship_enrollments),
        )
        .route("/{id}/enroll", web::post().to(mentorship::enroll))
        .route("/{id}", web::get().to(mentorship::get_offer))
        .route("/{id}", web::put().to(mentorship::update_offer))
        .route("/{id}", web::delete().to(mentorship::delete_offer))
}

/// 博客路由 `/blog`
fn blog_routes() -> actix_web::Scope {
    web::scope("/blog")
        .route("", web::get().to(blog::list_posts))
        .route("", web::post().to(blog::create_post))
        .route("/{slug}", web::get().to(blog::get_post))
        .route("/{slug}", web::put().to(blog::update_post))
}

/// 推广路由 `/affiliates`
fn affiliates_routes() -> actix_web::Scope {
    web::scope("/affiliates")
        .route("/referrals", web::get().to(affiliates::my_referrals))
        .route("/commissions", web::get().to(affiliates::my_commissions))
        .route("/link", web::get().to(affiliates::my_referral_code))
}

/// 订阅路由 `/subscriptions`
fn subscriptions_routes() -> actix_web::Scope {
    web::scope("/subscriptions")
        .route("/plans", web::get().to(subscriptions::list_plans))
        .route("/current", web::get().to(subscriptions::current_subscription))
        .route("/purchase", web::post().to(subscriptions::purchase_plan))
}

/// 通知路由 `/notifications`
fn notifications_routes() -> actix_web::Scope {
    web::scope("/notifications")
        .route("", web::get().to(notifications::list_notifications))
        .route("/unread-count", web::get().to(notifications::unread_count))
        .route("/read-all", web::post().to(notifications::mark_all_read))
        .route("/{id}/read", web::post().to(notifications::mark_read))
}

/// 健康检查路由 `/health`
fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(health::health_check))
        .route("/live", web::get().to(health::liveness_check))
        .route("/ready", web::get().to(health::readiness_check))
}

/// 启动 HTTP 服务器
pub async fn run_server() -> Result<()> {
    let config = get_config();
    validate_cors_config();

    let StartupContext {
        storage,
        ledger,
        kyc: kyc_service,
        catalog,
        accounts,
        subscriptions: subscription_service,
    } = prepare_server_startup().await?;

    let app_start_time = AppStartTime {
        start_datetime: Utc::now(),
    };

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(ledger.clone()))
            .app_data(web::Data::new(kyc_service.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(accounts.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(Compress::default())
            .wrap(build_cors_middleware())
            .wrap(RequestIdMiddleware)
            .service(
                web::scope("/api/v1")
                    .service(auth_routes())
                    .service(profile_routes())
                    .service(wallet_routes())
                    .service(kyc_routes())
                    .service(jobs_routes())
                    .service(courses_routes())
                    .service(products_routes())
                    .service(mentorship_routes())
                    .service(blog_routes())
                    .service(affiliates_routes())
                    .service(subscriptions_routes())
                    .service(notifications_routes()),
            )
            .service(
                web::scope("/admin")
                    .wrap(RequireAuth::staff())
                    .service(admin_v1_routes()),
            )
            .service(
                web::scope("/webhooks")
                    .route("/monnify", web::post().to(webhook::monnify_webhook)),
            )
            .service(health_routes())
    })
    .workers(config.server.cpu_count)
    .bind(&bind_address)?
    .run()
    .await?;

    shutdown_cleanup();
    Ok(())
}
