//! Admin API 路由配置
//!
//! 将 /admin/v1 下的路由按功能模块拆分，提高可读性和可维护性。

use actix_web::web;

use super::moderation::{
    pay_commission, pending_queues, platform_stats, retrigger_provisioning, review_course,
    review_job, review_kyc, review_manual_deposit, review_mentorship_offer, review_product,
    review_withdrawal, verify_provider_transaction, verify_user,
};
use super::settings::{
    create_category, create_promo_code, get_settings, list_categories, sync_banks,
    update_settings, upsert_subscription_plan,
};

/// 审核路由 `/moderation`
///
/// 包含：
/// - GET /moderation/pending - 各类待审条目
/// - POST /moderation/{kind}/{id} - 审核通过 / 驳回
/// - POST /moderation/kyc/{user_id}/provision - 虚拟账户开户重试
/// - POST /moderation/deposits|withdrawals/{id} - 资金审批
/// - POST /moderation/commissions/{id}/pay - 佣金打款
pub fn moderation_routes() -> actix_web::Scope {
    web::scope("/moderation")
        .route("/pending", web::get().to(pending_queues))
        .route("/jobs/{id}", web::post().to(review_job))
        .route("/courses/{id}", web::post().to(review_course))
        .route("/products/{id}", web::post().to(review_product))
        .route("/mentorship/{id}", web::post().to(review_mentorship_offer))
        // provision 必须在 /kyc/{id} 之前
        .route("/kyc/{user_id}/provision", web::post().to(retrigger_provisioning))
        .route("/kyc/{id}", web::post().to(review_kyc))
        .route("/deposits/{id}", web::post().to(review_manual_deposit))
        .route(
            "/transactions/{reference}/verify",
            web::get().to(verify_provider_transaction),
        )
        .route("/withdrawals/{id}", web::post().to(review_withdrawal))
        .route("/commissions/{id}/pay", web::post().to(pay_commission))
        .route("/users/{id}/verify", web::post().to(verify_user))
}

/// 配置路由 `/settings` 与目录维护
pub fn settings_routes() -> actix_web::Scope {
    web::scope("/settings")
        .route("", web::get().to(get_settings))
        .route("", web::put().to(update_settings))
        .route("/sync-banks", web::post().to(sync_banks))
}

/// Admin API v1 路由
///
/// 组合所有子模块路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(moderation_routes())
        .service(settings_routes())
        .route("/stats", web::get().to(platform_stats))
        .route("/categories", web::get().to(list_categories))
        .route("/categories", web::post().to(create_category))
        .route("/promo-codes", web::post().to(create_promo_code))
        .route("/subscription-plans", web::put().to(upsert_subscription_plan))
}
