//! 课程市场端点

use actix_web::{Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::services::CatalogService;
use crate::storage::backend::catalog::NewCourse;
use crate::storage::{ListingQuery, SeaOrmStorage};

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::PaginationInfo;

use migration::entities::course;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CourseListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub category: Option<i64>,
    pub level: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub level: String,
    pub instructor_id: i64,
    pub duration: i32,
    pub mode: String,
    pub start_date: String,
    pub is_self_paced: bool,
    pub price: Decimal,
    pub spots_total: i32,
    pub spots_left: i32,
    pub preview_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            category_id: course.category_id,
            level: course.level,
            instructor_id: course.instructor_id,
            duration: course.duration,
            mode: course.mode,
            start_date: course.start_date.to_rfc3339(),
            is_self_paced: course.is_self_paced,
            price: course.price,
            spots_total: course.spots_total,
            spots_left: course.spots_left,
            preview_video_url: course.preview_video_url,
            thumbnail_url: course.thumbnail_url,
            status: course.status,
            created_at: course.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateCourseBody {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    #[serde(default = "default_level")]
    pub level: String,
    pub duration: i32,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub start_date: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub is_self_paced: bool,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_spots")]
    pub spots_total: i32,
    pub preview_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

fn default_level() -> String {
    "beginner".to_string()
}

fn default_mode() -> String {
    "online".to_string()
}

fn default_spots() -> i32 {
    1
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct EnrollBody {
    pub promo_code: Option<String>,
}

/// GET /courses
pub async fn list_courses(
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<CourseListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        status: None,
        category_id: query.category,
        search: query.search.clone(),
        variant: query.level.clone(),
        owner_id: None,
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_courses(listing).await {
        Ok((rows, total)) => {
            let data: Vec<CourseResponse> = rows.into_iter().map(CourseResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /courses/mine — 自己开的课
pub async fn my_courses(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<CourseListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        owner_id: Some(auth.id),
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
        ..Default::default()
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_courses(listing).await {
        Ok((rows, total)) => {
            let data: Vec<CourseResponse> = rows.into_iter().map(CourseResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /courses/{id}
pub async fn get_course(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage.get_course(id).await {
        Ok(Some(course)) if course.status == "approved" => {
            Ok(success_response(CourseResponse::from(course)))
        }
        Ok(_) => Ok(error_from_vinaji(&crate::errors::VinajiError::not_found(
            format!("课程不存在: {}", id),
        ))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /courses
pub async fn create_course(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    body: web::Json<CreateCourseBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .create_course(NewCourse {
            title: body.title,
            description: body.description,
            category_id: body.category_id,
            level: body.level,
            instructor_id: auth.id,
            duration: body.duration,
            mode: body.mode,
            start_date: body.start_date,
            is_self_paced: body.is_self_paced,
            price: body.price,
            spots_total: body.spots_total,
            preview_video_url: body.preview_video_url,
            thumbnail_url: body.thumbnail_url,
        })
        .await
    {
        Ok(course) => Ok(success_response(CourseResponse::from(course))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /courses/{id}/enroll
pub async fn enroll_course(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    body: web::Json<EnrollBody>,
) -> ActixResult<impl Responder> {
    match catalog
        .enroll_course(auth.id, path.into_inner(), body.promo_code.clone())
        .await
    {
        Ok(enrollment) => Ok(success_response(enrollment)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /courses/enrollments — 自己的报名
pub async fn my_enrollments(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_course_enrollments(auth.id).await {
        Ok(enrollments) => Ok(success_response(enrollments)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateCourseBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// PUT /courses/{id} — 讲师编辑，重回待审
pub async fn update_course(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    body: web::Json<UpdateCourseBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .update_course(
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
        Ok(model) => Ok(success_response(CourseResponse::from(model))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// DELETE /courses/{id}
pub async fn delete_course(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match catalog.delete_course(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(super::types::MessageResponse::new("Course deleted"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
