//! 通知端点

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::storage::SeaOrmStorage;

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::{MessageResponse, PageQuery, PaginationInfo};

/// GET /notifications
pub async fn list_notifications(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<PageQuery>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = (query.page(), query.page_size());
    match storage.list_notifications(auth.id, page, page_size).await {
        Ok((rows, total)) => Ok(paginated_response(
            rows,
            PaginationInfo::new(page, page_size, total),
        )),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.unread_notification_count(auth.id).await {
        Ok(count) => Ok(success_response(serde_json::json!({ "unread": count }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match storage.mark_notification_read(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(MessageResponse::new("Notification marked as read"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.mark_all_notifications_read(auth.id).await {
        Ok(count) => Ok(success_response(serde_json::json!({ "marked": count }))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
