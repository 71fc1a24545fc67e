//! 职位市场端点

use actix_web::{Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::services::CatalogService;
use crate::storage::backend::catalog::NewJob;
use crate::storage::{ListingQuery, SeaOrmStorage};

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::PaginationInfo;

use migration::entities::job;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct JobListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub category: Option<i64>,
    pub job_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub job_type: String,
    pub location: String,
    pub company_name: String,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub deadline: String,
    pub spots_total: i32,
    pub spots_left: i32,
    pub level_requirement: String,
    pub price: Decimal,
    pub status: String,
    pub views_count: i64,
    pub created_at: String,
}

impl From<job::Model> for JobResponse {
    fn from(job: job::Model) -> Self {
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            category_id: job.category_id,
            job_type: job.job_type,
            location: job.location,
            company_name: job.company_name,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            deadline: job.deadline.to_rfc3339(),
            spots_total: job.spots_total,
            spots_left: job.spots_left,
            level_requirement: job.level_requirement,
            price: job.price,
            status: job.status,
            views_count: job.views_count,
            created_at: job.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateJobBody {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub job_type: String,
    pub location: String,
    pub company_name: String,
    pub company_logo_url: Option<String>,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub deadline: chrono::DateTime<chrono::Utc>,
    #[serde(default = "default_spots")]
    pub spots_total: i32,
    #[serde(default = "default_level")]
    pub level_requirement: String,
    #[serde(default)]
    pub price: Decimal,
}

fn default_spots() -> i32 {
    1
}

fn default_level() -> String {
    "entry".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PurchaseJobBody {
    pub notes: Option<String>,
}

/// GET /jobs — 公开列表（已上架）
pub async fn list_jobs(
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<JobListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        status: None,
        category_id: query.category,
        search: query.search.clone(),
        variant: query.job_type.clone(),
        owner_id: None,
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_jobs(listing).await {
        Ok((rows, total)) => {
            let data: Vec<JobResponse> = rows.into_iter().map(JobResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /jobs/mine — 自己发布的（任意状态）
pub async fn my_jobs(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<JobListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        owner_id: Some(auth.id),
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
        ..Default::default()
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_jobs(listing).await {
        Ok((rows, total)) => {
            let data: Vec<JobResponse> = rows.into_iter().map(JobResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /jobs/{id} — 详情（浏览计数）
pub async fn get_job(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage.get_job(id).await {
        Ok(Some(job)) if job.status == "approved" => {
            let _ = storage.increment_job_views(id).await;
            Ok(success_response(JobResponse::from(job)))
        }
        Ok(_) => Ok(error_from_vinaji(&crate::errors::VinajiError::not_found(
            format!("职位不存在: {}", id),
        ))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /jobs
pub async fn create_job(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    body: web::Json<CreateJobBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .create_job(NewJob {
            title: body.title,
            description: body.description,
            category_id: body.category_id,
            job_type: body.job_type,
            location: body.location,
            company_name: body.company_name,
            company_logo_url: body.company_logo_url,
            salary_min: body.salary_min,
            salary_max: body.salary_max,
            deadline: body.deadline,
            spots_total: body.spots_total,
            level_requirement: body.level_requirement,
            price: body.price,
            posted_by: auth.id,
        })
        .await
    {
        Ok(job) => Ok(success_response(JobResponse::from(job))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateJobBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub price: Option<Decimal>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

/// PUT /jobs/{id} — 作者编辑，重回待审
pub async fn update_job(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    body: web::Json<UpdateJobBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .update_job(
            auth.id,
            path.into_inner(),
            crate::services::catalog::JobPatch {
                title: body.title,
                description: body.description,
                category_id: body.category_id,
                job_type: body.job_type,
                location: body.location,
                price: body.price,
                deadline: body.deadline,
            },
        )
        .await
    {
        Ok(job) => Ok(success_response(JobResponse::from(job))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// DELETE /jobs/{id}
pub async fn delete_job(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match catalog.delete_job(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(super::types::MessageResponse::new("Job deleted"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /jobs/{id}/purchase
pub async fn purchase_job(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    body: web::Json<PurchaseJobBody>,
) -> ActixResult<impl Responder> {
    match catalog
        .purchase_job(auth.id, path.into_inner(), body.notes.clone())
        .await
    {
        Ok(purchase) => Ok(success_response(purchase)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /jobs/purchases — 自己买过的
pub async fn my_job_purchases(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_job_purchases(auth.id).await {
        Ok(purchases) => Ok(success_response(purchases)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
