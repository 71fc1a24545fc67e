//! 博客端点：公开阅读，staff 发布

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::errors::VinajiError;
use crate::storage::SeaOrmStorage;

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::{PageQuery, PaginationInfo};

use migration::entities::blog_post;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BlogPostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub published_at: Option<String>,
    pub views_count: i64,
}

impl From<blog_post::Model> for BlogPostResponse {
    fn from(post: blog_post::Model) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            body: post.body,
            author_id: post.author_id,
            category_id: post.category_id,
            published_at: post.published_at.map(|dt| dt.to_rfc3339()),
            views_count: post.views_count,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateBlogPostBody {
    pub title: String,
    pub slug: Option<String>,
    pub body: String,
    pub category_id: Option<i64>,
    #[serde(default = "default_publish")]
    pub publish: bool,
}

fn default_publish() -> bool {
    true
}

fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// GET /blog — 已发布文章
pub async fn list_posts(
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<PageQuery>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = (query.page(), query.page_size());
    match storage.list_blog_posts(true, page, page_size).await {
        Ok((rows, total)) => {
            let data: Vec<BlogPostResponse> =
                rows.into_iter().map(BlogPostResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /blog/{slug} — 详情（浏览计数）
pub async fn get_post(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let slug = path.into_inner();
    match storage.get_blog_post_by_slug(&slug).await {
        Ok(Some(post)) if post.is_published => {
            let _ = storage.increment_blog_views(&slug).await;
            Ok(success_response(BlogPostResponse::from(post)))
        }
        Ok(_) => Ok(error_from_vinaji(&VinajiError::not_found(format!(
            "文章不存在: {}",
            slug
        )))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /blog — 仅 staff
pub async fn create_post(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<CreateBlogPostBody>,
) -> ActixResult<impl Responder> {
    if !auth.staff {
        return Ok(error_from_vinaji(&VinajiError::forbidden(
            "只有 staff 可以发布文章",
        )));
    }

    let body = body.into_inner();
    let slug = body
        .slug
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&body.title));
    if slug.is_empty() {
        return Ok(error_from_vinaji(&VinajiError::validation("slug 不能为空")));
    }

    if let Ok(Some(_)) = storage.get_blog_post_by_slug(&slug).await {
        return Ok(error_from_vinaji(&VinajiError::conflict(format!(
            "slug 已存在: {}",
            slug
        ))));
    }

    match storage
        .insert_blog_post(
            body.title,
            slug,
            body.body,
            auth.id,
            body.category_id,
            body.publish,
        )
        .await
    {
        Ok(post) => Ok(success_response(BlogPostResponse::from(post))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateBlogPostBody {
    pub title: Option<String>,
    pub body: Option<String>,
    pub publish: Option<bool>,
}

/// PUT /blog/{slug} — 仅 staff
pub async fn update_post(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    body: web::Json<UpdateBlogPostBody>,
) -> ActixResult<impl Responder> {
    if !auth.staff {
        return Ok(error_from_vinaji(&VinajiError::forbidden(
            "只有 staff 可以编辑文章",
        )));
    }

    let body = body.into_inner();
    match storage
        .update_blog_post(&path.into_inner(), body.title, body.body, body.publish)
        .await
    {
        Ok(post) => Ok(success_response(BlogPostResponse::from(post))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Rust & Money: A Story!"), "rust-money-a-story");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
