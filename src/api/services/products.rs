//! 数字商品市场端点

use actix_web::{Responder, Result as ActixResult, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::AuthUser;
use crate::services::CatalogService;
use crate::storage::backend::catalog::NewProduct;
use crate::storage::{ListingQuery, SeaOrmStorage};

use super::helpers::{error_from_vinaji, paginated_response, success_response};
use super::types::PaginationInfo;

use migration::entities::product;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProductListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub category: Option<i64>,
    pub license_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub seller_id: i64,
    pub category_id: i64,
    pub license_type: String,
    pub version: String,
    pub price: Decimal,
    pub thumbnail_url: Option<String>,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub views_count: i64,
    pub download_count: i64,
    pub created_at: String,
}

impl From<product::Model> for ProductResponse {
    fn from(product: product::Model) -> Self {
        // 换行分隔的 features、逗号分隔的 tags 拆成数组
        let features = product
            .features
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        let tags = product
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            seller_id: product.seller_id,
            category_id: product.category_id,
            license_type: product.license_type,
            version: product.version,
            price: product.price,
            thumbnail_url: product.thumbnail_url,
            features,
            tags,
            status: product.status,
            views_count: product.views_count,
            download_count: product.download_count,
            created_at: product.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateProductBody {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    #[serde(default = "default_license")]
    pub license_type: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub price: Decimal,
    pub thumbnail_url: Option<String>,
    pub download_url: Option<String>,
    pub features: Option<String>,
    pub tags: Option<String>,
}

fn default_license() -> String {
    "personal".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

/// GET /products
pub async fn list_products(
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<ProductListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        status: None,
        category_id: query.category,
        search: query.search.clone(),
        variant: query.license_type.clone(),
        owner_id: None,
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_products(listing).await {
        Ok((rows, total)) => {
            let data: Vec<ProductResponse> = rows.into_iter().map(ProductResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /products/mine
pub async fn my_products(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
    query: web::Query<ProductListQuery>,
) -> ActixResult<impl Responder> {
    let listing = ListingQuery {
        owner_id: Some(auth.id),
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(20),
        ..Default::default()
    }
    .normalized();
    let (page, page_size) = (listing.page, listing.page_size);

    match storage.list_products(listing).await {
        Ok((rows, total)) => {
            let data: Vec<ProductResponse> = rows.into_iter().map(ProductResponse::from).collect();
            Ok(paginated_response(
                data,
                PaginationInfo::new(page, page_size, total),
            ))
        }
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /products/{id} — 详情（浏览计数）
pub async fn get_product(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match storage.get_product(id).await {
        Ok(Some(product)) if product.status == "approved" => {
            let _ = storage.increment_product_views(id).await;
            Ok(success_response(ProductResponse::from(product)))
        }
        Ok(_) => Ok(error_from_vinaji(&crate::errors::VinajiError::not_found(
            format!("商品不存在: {}", id),
        ))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /products
pub async fn create_product(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    body: web::Json<CreateProductBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .create_product(NewProduct {
            title: body.title,
            description: body.description,
            seller_id: auth.id,
            category_id: body.category_id,
            license_type: body.license_type,
            version: body.version,
            price: body.price,
            thumbnail_url: body.thumbnail_url,
            download_url: body.download_url,
            features: body.features,
            tags: body.tags,
        })
        .await
    {
        Ok(product) => Ok(success_response(ProductResponse::from(product))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// POST /products/{id}/purchase
pub async fn purchase_product(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match catalog.purchase_product(auth.id, path.into_inner()).await {
        Ok(sale) => Ok(success_response(sale)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// GET /products/purchases — 买到的商品（含授权码）
pub async fn my_product_purchases(
    auth: AuthUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.list_product_sales(auth.id).await {
        Ok(sales) => Ok(success_response(sales)),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateProductBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// PUT /products/{id} — 卖家编辑，重回待审
pub async fn update_product(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
    body: web::Json<UpdateProductBody>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    match catalog
        .update_product(
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
        Ok(model) => Ok(success_response(ProductResponse::from(model))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}

/// DELETE /products/{id}
pub async fn delete_product(
    auth: AuthUser,
    catalog: web::Data<Arc<CatalogService>>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    match catalog.delete_product(auth.id, path.into_inner()).await {
        Ok(()) => Ok(success_response(super::types::MessageResponse::new("Product deleted"))),
        Err(e) => Ok(error_from_vinaji(&e)),
    }
}
