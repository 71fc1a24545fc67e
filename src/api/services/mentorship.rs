//! 导师服务端点

use actix_web::{Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::services::{CatalogService, SubscriptionService};
use crate::storage::backend::catalog::NewMentorshipOffer;
use crate::storage::{ListingQuery, SeaOrmStorage};

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::PaginationInfo;

use migration::entities::mentorship_offer;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OfferListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OfferResponse {
    pub id: i64,
    pub mentor_id: i64,
    pub title: String,
    pub description: String,
    pub expertise_area: String,
    pub price_per_hour: Decimal,
    pub subscription_requirement: String,
    pub max_students: i32,
    pub current_students: i32,
    pub is_available: bool,
    pub status: String,
    pub created_at: String,
}

impl From<mentorship_offer::Model> for OfferResponse {
    fn from(offer: mentorship_offer::Model) -> Self {
        Self {
            id: offer.id,
            mentor_id: offer.mentor_id,
            title: offer.title,
            description: offer.description,
            expertise_area: offer.expertise_area,
            price_per_hour: offer.price_per_hour,
            subscription_requirement: offer.subscription_requirement,
            max_students: offer.max_students,
            current_students: offer.current_students,
            is_available: offer.is_available,
            status: offer.status,
            created_at: offer.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateOfferBody {
    pub title: String,
    pub description: String,
    pub expertise_area: String,
    pub price_per_hour: Decimal,
    #[serde(default = "default_requirement")]
    pub subscription_requirement: String,
    #[serde(default = "default_max_students")]
    pub max_students: i32,
}

fn default_requirement() -> String {
    "starter".to_string()
}

fn default_max_students() -> i32 {
    1
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnrollMentorshipBody {
    pub requested_hours: i32,
    pub application_message: Option<String>,
}

/// GET /mentorship
pub async fn list_offers(
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<OfferListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        search: query.search.clone(),
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
        ..Default::default()
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_mentorship_offers(listing).await {
        Ok((rows, total)) => {
            let data: Vec<OfferResponse> = rows.into_iter().map(OfferResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /mentorship/mine — 自己挂出的服务
pub async fn my_offers(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<OfferListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        owner_id: Some(auth.id),
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
        ..Default::default()
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_mentorship_offers(listing).await {
        Ok((rows, total)) => {
            let data: Vec<OfferResponse> = rows.into_iter().map(OfferResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /mentorship/{id}
pub async fn get_offer(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage.get_mentorship_offer(id).await {
        Ok(Some(offer)) if offer.status == "approved" => {
            Ok(success_response(OfferResponse::from(offer)))
        }
        Ok(_) => Ok(error_from_vinaji(&VinajiError::not_found(format!(
            "导师服务不存在: {}",
            id
        )))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /mentorship
pub async fn create_offer(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    body: web::Json<CreateOfferBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();

    if body.subscription_requirement.parse::<crate::storage::SubscriptionLevel>().is_err() {
        return Ok(error_from_vinaji(&VinajiError::validation(format!(
            "订阅档位无效: {}",
            body.subscription_requirement
        ))));
    }

    match catalog
        .create_mentorship_offer(NewMentorshipOffer {
            mentor_id: auth.id,
            title: body.title,
            description: body.description,
            expertise_area: body.expertise_area,
            price_per_hour: body.price_per_hour,
            subscription_requirement: body.subscription_requirement,
            max_students: body.max_students,
        })
        .await
    {
        Ok(offer) => Ok(success_response(OfferResponse::from(offer))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /mentorship/{id}/enroll — 按小时计费报名
pub async fn enroll(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    catalog: web::Data<Arc<CatalogService>>,
    subscriptions: web::Data<Arc<SubscriptionService>>,
    path: web::Path<i64>,
    body: web::Json<EnrollMentorshipBody>,
) -> ActixResult<impl Responder> {
    // 报名门槛按实际生效档位判断
    let level = match storage.find_user(auth.id).await {
        Ok(Some(user)) => match subscriptions.effective_level(&user).await {
            Ok(level) => level,
            Err(e) => return Ok(error_from_vinaji(&e)),
        },
        Ok(None) => return Ok(error_from_vinaji(&VinajiError::not_found("用户不存在"))),
        Err(e) => return Ok(error_from_vinaji(&e)),
    };

    match catalog
        .enroll_mentorship(
            auth.id,
            level,
            path.into_inner(),
            body.requested_hours,
            body.application_message.clone(),
        )
        .await
    {
        Ok(enrollment) => Ok(success_response(enrollment)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /mentorship/enrollments — 自己的报名
pub async fn my_mentorship_enrollments(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_mentorship_enrollments(auth.id).await {
        Ok(enrollments) => Ok(success_response(enrollments)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateOfferBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// PUT /mentorship/{id} — 导师编辑，重回待审
pub async fn update_offer(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    body: web::Json<UpdateOfferBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .update_mentorship_offer(
            auth.id,
            path.into_inner(),
            crate::services::catalog::ListingPatch {
                title: body.title,
                description: body.description,
                price: body.price,
            },
        )
        .await
    {
        Ok(model) => Ok(success_response(OfferResponse::from(model))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// DELETE /mentorship/{id}
pub async fn delete_offer(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match catalog.delete_mentorship_offer(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(super::types::MessageResponse::new("Offer deleted"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
