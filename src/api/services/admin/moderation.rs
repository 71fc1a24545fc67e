//! 管理端审核端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::middleware::AuthUser;
use crate::api::services::helpers::{error_from_vinaji, success_response};
use crate::api::services::types::MessageResponse;
use crate::errors::VinajiError;
use crate::services::{KycService, LedgerService};
use crate::storage::backend::notifications;
use crate::storage::{ListingQuery, ListingStatus, SeaOrmStorage};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReviewBody {
    pub approve: bool,
    pub reason: Option<String>,
}

fn review_status(approve: bool) -> ListingStatus {
    if approve { ListingStatus::Approved } else { ListingStatus::Rejected }
}

/// 审核通过 / 驳回后的站内通知
async fn notify_listing_review(
    storage: &SeaOrmStorage,
    user_id: i64,
    kind: &str,
    title: &str,
    approve: bool,
    related: (i64, &str),
) {
    let (subject, message) = if approve {
        (
            format!("{} Approved", kind),
            format!("Your {} \"{}\" has been approved and is now live.", kind.to_lowercase(), title),
        )
    } else {
        (
            format!("{} Rejected", kind),
            format!("Your {} \"{}\" was rejected. Check the reason and resubmit.", kind.to_lowercase(), title),
        )
    };
    let _ = notifications::insert_notification(
        storage.get_db(),
        user_id,
        "approval",
        subject,
        message,
        Some(related),
    )
    .await;
}

// ============ 待审队列 ============

/// GET /admin/v1/moderation/pending — 各类待审条目汇总
pub async fn pending_queues(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let pending = |status: &str| ListingQuery {
        status: Some(status.to_string()),
        page: 1,
        page_size: 100,
        ..Default::default()
    };

    let result: Result<serde_json::Value, VinajiError> = async {
        let (jobs, _) = storage.list_jobs(pending("pending")).await?;
        let (courses, _) = storage.list_courses(pending("pending")).await?;
        let (products, _) = storage.list_products(pending("pending")).await?;
        let (offers, _) = storage.list_mentorship_offers(pending("pending")).await?;
        let kyc = storage.list_pending_kyc().await?;
        let deposits = storage.list_manual_deposits(None, Some("pending")).await?;
        let withdrawals = storage.list_pending_withdrawals().await?;
        let commissions = storage.list_affiliate_sales_by_status("pending").await?;

        Ok(serde_json::json!({
            "jobs": jobs,
            "courses": courses,
            "products": products,
            "mentorship_offers": offers,
            "kyc": kyc,
            "manual_deposits": deposits,
            "withdrawals": withdrawals,
            "commissions": commissions,
        }))
    }
    .await;

    match result {
        Ok(data) => Ok(success_response(data)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

// ============ 列表内容审核 ============

/// POST /admin/v1/moderation/jobs/{id}
pub async fn review_job(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage
        .set_job_status(id, review_status(body.approve), body.reason.clone())
        .await
    {
        Ok(job) => {
            info!("Admin {} reviewed job {}: approve={}", auth.id, id, body.approve);
            notify_listing_review(
                &storage,
                job.posted_by,
                "Job",
                &job.title,
                body.approve,
                (job.id, "job"),
            )
            .await;
            Ok(success_response(job))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/courses/{id}
pub async fn review_course(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage
        .set_course_status(id, review_status(body.approve), body.reason.clone())
        .await
    {
        Ok(course) => {
            info!("Admin {} reviewed course {}: approve={}", auth.id, id, body.approve);
            notify_listing_review(
                &storage,
                course.instructor_id,
                "Course",
                &course.title,
                body.approve,
                (course.id, "course"),
            )
            .await;
            Ok(success_response(course))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/products/{id}
pub async fn review_product(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage
        .set_product_status(id, review_status(body.approve), body.reason.clone())
        .await
    {
        Ok(product) => {
            info!("Admin {} reviewed product {}: approve={}", auth.id, id, body.approve);
            notify_listing_review(
                &storage,
                product.seller_id,
                "Product",
                &product.title,
                body.approve,
                (product.id, "product"),
            )
            .await;
            Ok(success_response(product))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/mentorship/{id}
pub async fn review_mentorship_offer(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage
        .set_mentorship_offer_status(id, review_status(body.approve), body.reason.clone())
        .await
    {
        Ok(offer) => {
            info!(
                "Admin {} reviewed mentorship offer {}: approve={}",
                auth.id, id, body.approve
            );
            notify_listing_review(
                &storage,
                offer.mentor_id,
                "Mentorship offer",
                &offer.title,
                body.approve,
                (offer.id, "mentorship_offer"),
            )
            .await;
            Ok(success_response(offer))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

// ============ KYC ============

/// POST /admin/v1/moderation/kyc/{id} — 审核（通过触发开户）
pub async fn review_kyc(
    auth: AuthUser,
    kyc: web::Data<Arc<KycService>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    match kyc
        .review(path.into_inner(), auth.id, body.approve, body.reason.clone())
        .await
    {
        Ok(outcome) => Ok(success_response(serde_json::json!({
            "kyc": outcome.kyc,
            "virtual_accounts": outcome.accounts,
            "provisioning_error": outcome.provisioning_error,
        }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/kyc/{user_id}/provision — 开户重试
pub async fn retrigger_provisioning(
    auth: AuthUser,
    kyc: web::Data<Arc<KycService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    info!("Admin {} re-triggering provisioning for user {}", auth.id, user_id);
    match kyc.retrigger_provisioning(user_id).await {
        Ok(accounts) => Ok(success_response(accounts)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

// ============ 资金审批 ============

/// POST /admin/v1/moderation/deposits/{id}
pub async fn review_manual_deposit(
    auth: AuthUser,
    ledger: web::Data<Arc<LedgerService>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    match ledger
        .review_manual_deposit(path.into_inner(), auth.id, body.approve, body.reason.clone())
        .await
    {
        Ok(tx) => Ok(success_response(serde_json::json!({ "transaction": tx }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/withdrawals/{id}
pub async fn review_withdrawal(
    auth: AuthUser,
    ledger: web::Data<Arc<LedgerService>>,
    path: web::Path<i64>,
    body: web::Json<ReviewBody>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    info!("Admin {} reviewing withdrawal {}: approve={}", auth.id, id, body.approve);
    match ledger.review_withdrawal(id, body.approve).await {
        Ok(tx) => Ok(success_response(tx)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/commissions/{id}/pay
pub async fn pay_commission(
    auth: AuthUser,
    ledger: web::Data<Arc<LedgerService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    info!("Admin {} paying commission {}", auth.id, id);
    match ledger.pay_commission(id).await {
        Ok(tx) => Ok(success_response(tx)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /admin/v1/moderation/transactions/{reference}/verify
///
/// 入账有争议时到服务商侧核对：返回本地流水与服务商侧状态。
pub async fn verify_provider_transaction(
    storage: web::Data<Arc<SeaOrmStorage>>,
    kyc: web::Data<Arc<KycService>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let reference = path.into_inner();

    let local = match storage.find_tx_by_reference(&reference).await {
        Ok(tx) => tx,
        Err(e) => return Ok(error_from_vinaji(&e)),
    };

    match kyc.verify_provider_transaction(&reference).await {
        Ok(remote) => Ok(success_response(serde_json::json!({
            "local_transaction": local,
            "provider_status": remote,
        }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /admin/v1/moderation/users/{id}/verify — 人工标记认证
pub async fn verify_user(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    info!("Admin {} manually verifying user {}", auth.id, user_id);
    match storage.set_user_verified(user_id, true).await {
        Ok(()) => Ok(success_response(MessageResponse::new("User verified"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /admin/v1/stats
pub async fn platform_stats(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.platform_stats().await {
        Ok(stats) => Ok(success_response(stats)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
