//! Catalog storage operations: jobs, courses, products, mentorship offers,
//! blog posts, categories and promo codes.
//!
//! All listing kinds share the draft -> pending -> approved | rejected
//! moderation workflow; public list queries default to approved rows.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{ListingQuery, SeaOrmStorage};
use crate::errors::{Result, VinajiError};
use crate::storage::models::ListingStatus;

use migration::entities::{
    blog_post, category, course, course_enrollment, job, job_purchase, mentorship_enrollment,
    mentorship_offer, product, product_sale, promo_code,
};

/// 新职位
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub job_type: String,
    pub location: String,
    pub company_name: String,
    pub company_logo_url: Option<String>,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
    pub deadline: chrono::DateTime<Utc>,
    pub spots_total: i32,
    pub level_requirement: String,
    pub price: Decimal,
    pub posted_by: i64,
}

/// 新课程
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub level: String,
    pub instructor_id: i64,
    pub duration: i32,
    pub mode: String,
    pub start_date: chrono::DateTime<Utc>,
    pub is_self_paced: bool,
    pub price: Decimal,
    pub spots_total: i32,
    pub preview_video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// 新商品
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub seller_id: i64,
    pub category_id: i64,
    pub license_type: String,
    pub version: String,
    pub price: Decimal,
    pub thumbnail_url: Option<String>,
    pub download_url: Option<String>,
    pub features: Option<String>,
    pub tags: Option<String>,
}

/// 新导师服务
#[derive(Debug, Clone)]
pub struct NewMentorshipOffer {
    pub mentor_id: i64,
    pub title: String,
    pub description: String,
    pub expertise_area: String,
    pub price_per_hour: Decimal,
    pub subscription_requirement: String,
    pub max_students: i32,
}

impl SeaOrmStorage {
    // ============ 分类 ============

    pub async fn list_categories(&self, category_type: Option<&str>) -> Result<Vec<category::Model>> {
        let mut query = category::Entity::find().filter(category::Column::IsActive.eq(true));
        if let Some(kind) = category_type {
            query = query.filter(category::Column::CategoryType.eq(kind));
        }
        Ok(query.order_by_asc(category::Column::Name).all(&self.db).await?)
    }

    pub async fn create_category(
        &self,
        name: String,
        category_type: String,
        description: Option<String>,
    ) -> Result<category::Model> {
        let existing = category::Entity::find()
            .filter(category::Column::Name.eq(&name))
            .filter(category::Column::CategoryType.eq(&category_type))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(VinajiError::conflict(format!("分类已存在: {}", name)));
        }

        Ok(category::ActiveModel {
            name: Set(name),
            category_type: Set(category_type),
            description: Set(description),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn find_category(&self, id: i64) -> Result<Option<category::Model>> {
        Ok(category::Entity::find_by_id(id).one(&self.db).await?)
    }

    // ============ 职位 ============

    pub async fn insert_job(&self, new: NewJob) -> Result<job::Model> {
        let now = Utc::now();
        let created = job::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            category_id: Set(new.category_id),
            job_type: Set(new.job_type),
            location: Set(new.location),
            company_name: Set(new.company_name),
            company_logo_url: Set(new.company_logo_url),
            salary_min: Set(new.salary_min),
            salary_max: Set(new.salary_max),
            deadline: Set(new.deadline),
            spots_total: Set(new.spots_total),
            spots_left: Set(new.spots_total),
            level_requirement: Set(new.level_requirement),
            price: Set(new.price),
            posted_by: Set(new.posted_by),
            status: Set(ListingStatus::Pending.to_string()),
            views_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.invalidate_count_cache();
        Ok(created)
    }

    pub async fn get_job(&self, id: i64) -> Result<Option<job::Model>> {
        Ok(job::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_jobs(&self, query: ListingQuery) -> Result<(Vec<job::Model>, u64)> {
        let query = query.normalized();
        let mut condition = Condition::all();

        // owner 查询不指定状态时返回全部状态，公开查询默认只看已上架
        let status = match (&query.status, query.owner_id) {
            (Some(status), _) => Some(status.clone()),
            (None, Some(_)) => None,
            (None, None) => Some("approved".to_string()),
        };
        if let Some(ref status) = status {
            condition = condition.add(job::Column::Status.eq(status.clone()));
        }
        if let Some(category_id) = query.category_id {
            condition = condition.add(job::Column::CategoryId.eq(category_id));
        }
        if let Some(ref variant) = query.variant {
            condition = condition.add(job::Column::JobType.eq(variant));
        }
        if let Some(owner) = query.owner_id {
            condition = condition.add(job::Column::PostedBy.eq(owner));
        }
        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(job::Column::Title.like(&pattern))
                    .add(job::Column::Description.like(&pattern))
                    .add(job::Column::CompanyName.like(&pattern)),
            );
        }

        let find = job::Entity::find().filter(condition);

        let cache_key = format!(
            "jobs:s={:?}:c={:?}:v={:?}:o={:?}:q={:?}",
            status, query.category_id, query.variant, query.owner_id, query.search
        );
        let total = if let Some(cached) = self.count_cache().get(&cache_key) {
            cached
        } else {
            let count = find.clone().count(&self.db).await?;
            self.count_cache().insert(cache_key, count);
            count
        };

        let rows = find
            .order_by_desc(job::Column::CreatedAt)
            .paginate(&self.db, query.page_size)
            .fetch_page(query.page - 1)
            .await?;

        Ok((rows, total))
    }

    pub async fn update_job(&self, updated: job::ActiveModel) -> Result<job::Model> {
        let model = updated.update(&self.db).await?;
        self.invalidate_count_cache();
        Ok(model)
    }

    pub async fn set_job_status(
        &self,
        id: i64,
        status: ListingStatus,
        rejection_reason: Option<String>,
    ) -> Result<job::Model> {
        let job = self
            .get_job(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("职位不存在: {}", id)))?;
        let mut active: job::ActiveModel = job.into();
        active.status = Set(status.to_string());
        active.rejection_reason = Set(rejection_reason);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        self.invalidate_count_cache();
        info!("Job {} -> {}", id, status);
        Ok(model)
    }

    pub async fn increment_job_views(&self, id: i64) -> Result<()> {
        if let Some(job) = self.get_job(id).await? {
            let views = job.views_count + 1;
            let mut active: job::ActiveModel = job.into();
            active.views_count = Set(views);
            active.update(&self.db).await?;
        }
        Ok(())
    }

    pub async fn has_job_purchase(&self, job_id: i64, buyer_id: i64) -> Result<bool> {
        Ok(job_purchase::Entity::find()
            .filter(job_purchase::Column::JobId.eq(job_id))
            .filter(job_purchase::Column::BuyerId.eq(buyer_id))
            .one(&self.db)
            .await?
            .is_some())
    }

    pub async fn list_job_purchases(&self, buyer_id: i64) -> Result<Vec<job_purchase::Model>> {
        Ok(job_purchase::Entity::find()
            .filter(job_purchase::Column::BuyerId.eq(buyer_id))
            .order_by_desc(job_purchase::Column::PurchasedAt)
            .all(&self.db)
            .await?)
    }

    // ============ 课程 ============

    pub async fn insert_course(&self, new: NewCourse) -> Result<course::Model> {
        let now = Utc::now();
        let created = course::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            category_id: Set(new.category_id),
            level: Set(new.level),
            instructor_id: Set(new.instructor_id),
            duration: Set(new.duration),
            mode: Set(new.mode),
            start_date: Set(new.start_date),
            is_self_paced: Set(new.is_self_paced),
            price: Set(new.price),
            spots_total: Set(new.spots_total),
            spots_left: Set(new.spots_total),
            preview_video_url: Set(new.preview_video_url),
            thumbnail_url: Set(new.thumbnail_url),
            status: Set(ListingStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.invalidate_count_cache();
        Ok(created)
    }

    pub async fn get_course(&self, id: i64) -> Result<Option<course::Model>> {
        Ok(course::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_courses(&self, query: ListingQuery) -> Result<(Vec<course::Model>, u64)> {
        let query = query.normalized();
        let mut condition = Condition::all();

        // owner 查询不指定状态时返回全部状态，公开查询默认只看已上架
        let status = match (&query.status, query.owner_id) {
            (Some(status), _) => Some(status.clone()),
            (None, Some(_)) => None,
            (None, None) => Some("approved".to_string()),
        };
        if let Some(ref status) = status {
            condition = condition.add(course::Column::Status.eq(status.clone()));
        }
        if let Some(category_id) = query.category_id {
            condition = condition.add(course::Column::CategoryId.eq(category_id));
        }
        if let Some(ref variant) = query.variant {
            condition = condition.add(course::Column::Level.eq(variant));
        }
        if let Some(owner) = query.owner_id {
            condition = condition.add(course::Column::InstructorId.eq(owner));
        }
        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(course::Column::Title.like(&pattern))
                    .add(course::Column::Description.like(&pattern)),
            );
        }

        let find = course::Entity::find().filter(condition);

        let cache_key = format!(
            "courses:s={:?}:c={:?}:v={:?}:o={:?}:q={:?}",
            status, query.category_id, query.variant, query.owner_id, query.search
        );
        let total = if let Some(cached) = self.count_cache().get(&cache_key) {
            cached
        } else {
            let count = find.clone().count(&self.db).await?;
            self.count_cache().insert(cache_key, count);
            count
        };

        let rows = find
            .order_by_desc(course::Column::CreatedAt)
            .paginate(&self.db, query.page_size)
            .fetch_page(query.page - 1)
            .await?;

        Ok((rows, total))
    }

    pub async fn update_course(&self, updated: course::ActiveModel) -> Result<course::Model> {
        let model = updated.update(&self.db).await?;
        self.invalidate_count_cache();
        Ok(model)
    }

    pub async fn set_course_status(
        &self,
        id: i64,
        status: ListingStatus,
        rejection_reason: Option<String>,
    ) -> Result<course::Model> {
        let course = self
            .get_course(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("课程不存在: {}", id)))?;
        let mut active: course::ActiveModel = course.into();
        active.status = Set(status.to_string());
        active.rejection_reason = Set(rejection_reason);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        self.invalidate_count_cache();
        info!("Course {} -> {}", id, status);
        Ok(model)
    }

    pub async fn has_course_enrollment(&self, course_id: i64, student_id: i64) -> Result<bool> {
        Ok(course_enrollment::Entity::find()
            .filter(course_enrollment::Column::CourseId.eq(course_id))
            .filter(course_enrollment::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await?
            .is_some())
    }

    pub async fn list_course_enrollments(
        &self,
        student_id: i64,
    ) -> Result<Vec<course_enrollment::Model>> {
        Ok(course_enrollment::Entity::find()
            .filter(course_enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(course_enrollment::Column::EnrolledAt)
            .all(&self.db)
            .await?)
    }

    // ============ 促销码 ============

    pub async fn find_promo_by_code(&self, code: &str) -> Result<Option<promo_code::Model>> {
        Ok(promo_code::Entity::find()
            .filter(promo_code::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    pub async fn create_promo_code(
        &self,
        code: String,
        discount_percent: Decimal,
        discount_amount: Decimal,
        max_uses: i32,
        valid_until: chrono::DateTime<Utc>,
    ) -> Result<promo_code::Model> {
        Ok(promo_code::ActiveModel {
            code: Set(code),
            discount_percent: Set(discount_percent),
            discount_amount: Set(discount_amount),
            max_uses: Set(max_uses),
            used_count: Set(0),
            valid_until: Set(valid_until),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    // ============ 商品 ============

    pub async fn insert_product(&self, new: NewProduct) -> Result<product::Model> {
        let now = Utc::now();
        let created = product::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            seller_id: Set(new.seller_id),
            category_id: Set(new.category_id),
            license_type: Set(new.license_type),
            version: Set(new.version),
            price: Set(new.price),
            thumbnail_url: Set(new.thumbnail_url),
            download_url: Set(new.download_url),
            features: Set(new.features),
            tags: Set(new.tags),
            status: Set(ListingStatus::Pending.to_string()),
            views_count: Set(0),
            download_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.invalidate_count_cache();
        Ok(created)
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<product::Model>> {
        Ok(product::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_products(&self, query: ListingQuery) -> Result<(Vec<product::Model>, u64)> {
        let query = query.normalized();
        let mut condition = Condition::all();

        // owner 查询不指定状态时返回全部状态，公开查询默认只看已上架
        let status = match (&query.status, query.owner_id) {
            (Some(status), _) => Some(status.clone()),
            (None, Some(_)) => None,
            (None, None) => Some("approved".to_string()),
        };
        if let Some(ref status) = status {
            condition = condition.add(product::Column::Status.eq(status.clone()));
        }
        if let Some(category_id) = query.category_id {
            condition = condition.add(product::Column::CategoryId.eq(category_id));
        }
        if let Some(ref variant) = query.variant {
            condition = condition.add(product::Column::LicenseType.eq(variant));
        }
        if let Some(owner) = query.owner_id {
            condition = condition.add(product::Column::SellerId.eq(owner));
        }
        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(product::Column::Title.like(&pattern))
                    .add(product::Column::Description.like(&pattern))
                    .add(product::Column::Tags.like(&pattern)),
            );
        }

        let find = product::Entity::find().filter(condition);

        let cache_key = format!(
            "products:s={:?}:c={:?}:v={:?}:o={:?}:q={:?}",
            status, query.category_id, query.variant, query.owner_id, query.search
        );
        let total = if let Some(cached) = self.count_cache().get(&cache_key) {
            cached
        } else {
            let count = find.clone().count(&self.db).await?;
            self.count_cache().insert(cache_key, count);
            count
        };

        let rows = find
            .order_by_desc(product::Column::CreatedAt)
            .paginate(&self.db, query.page_size)
            .fetch_page(query.page - 1)
            .await?;

        Ok((rows, total))
    }

    pub async fn update_product(&self, updated: product::ActiveModel) -> Result<product::Model> {
        let model = updated.update(&self.db).await?;
        self.invalidate_count_cache();
        Ok(model)
    }

    pub async fn set_product_status(
        &self,
        id: i64,
        status: ListingStatus,
        rejection_reason: Option<String>,
    ) -> Result<product::Model> {
        let product = self
            .get_product(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("商品不存在: {}", id)))?;
        let mut active: product::ActiveModel = product.into();
        active.status = Set(status.to_string());
        active.rejection_reason = Set(rejection_reason);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        self.invalidate_count_cache();
        info!("Product {} -> {}", id, status);
        Ok(model)
    }

    pub async fn increment_product_views(&self, id: i64) -> Result<()> {
        if let Some(product) = self.get_product(id).await? {
            let views = product.views_count + 1;
            let mut active: product::ActiveModel = product.into();
            active.views_count = Set(views);
            active.update(&self.db).await?;
        }
        Ok(())
    }

    pub async fn list_product_sales(&self, buyer_id: i64) -> Result<Vec<product_sale::Model>> {
        Ok(product_sale::Entity::find()
            .filter(product_sale::Column::BuyerId.eq(buyer_id))
            .order_by_desc(product_sale::Column::PurchasedAt)
            .all(&self.db)
            .await?)
    }

    // ============ 导师服务 ============

    pub async fn insert_mentorship_offer(
        &self,
        new: NewMentorshipOffer,
    ) -> Result<mentorship_offer::Model> {
        let now = Utc::now();
        let created = mentorship_offer::ActiveModel {
            mentor_id: Set(new.mentor_id),
            title: Set(new.title),
            description: Set(new.description),
            expertise_area: Set(new.expertise_area),
            price_per_hour: Set(new.price_per_hour),
            subscription_requirement: Set(new.subscription_requirement),
            max_students: Set(new.max_students),
            current_students: Set(0),
            is_available: Set(true),
            status: Set(ListingStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.invalidate_count_cache();
        Ok(created)
    }

    pub async fn get_mentorship_offer(&self, id: i64) -> Result<Option<mentorship_offer::Model>> {
        Ok(mentorship_offer::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_mentorship_offers(
        &self,
        query: ListingQuery,
    ) -> Result<(Vec<mentorship_offer::Model>, u64)> {
        let query = query.normalized();
        let mut condition = Condition::all();

        // owner 查询不指定状态时返回全部状态，公开查询默认只看已上架
        let status = match (&query.status, query.owner_id) {
            (Some(status), _) => Some(status.clone()),
            (None, Some(_)) => None,
            (None, None) => Some("approved".to_string()),
        };
        if let Some(ref status) = status {
            condition = condition.add(mentorship_offer::Column::Status.eq(status.clone()));
        }
        if let Some(owner) = query.owner_id {
            condition = condition.add(mentorship_offer::Column::MentorId.eq(owner));
        }
        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(mentorship_offer::Column::Title.like(&pattern))
                    .add(mentorship_offer::Column::ExpertiseArea.like(&pattern)),
            );
        }

        let find = mentorship_offer::Entity::find().filter(condition);

        let cache_key = format!(
            "offers:s={:?}:o={:?}:q={:?}",
            status, query.owner_id, query.search
        );
        let total = if let Some(cached) = self.count_cache().get(&cache_key) {
            cached
        } else {
            let count = find.clone().count(&self.db).await?;
            self.count_cache().insert(cache_key, count);
            count
        };

        let rows = find
            .order_by_desc(mentorship_offer::Column::CreatedAt)
            .paginate(&self.db, query.page_size)
            .fetch_page(query.page - 1)
            .await?;

        Ok((rows, total))
    }

    pub async fn set_mentorship_offer_status(
        &self,
        id: i64,
        status: ListingStatus,
        rejection_reason: Option<String>,
    ) -> Result<mentorship_offer::Model> {
        let offer = self
            .get_mentorship_offer(id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("导师服务不存在: {}", id)))?;
        let mut active: mentorship_offer::ActiveModel = offer.into();
        active.status = Set(status.to_string());
        active.rejection_reason = Set(rejection_reason);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        self.invalidate_count_cache();
        info!("Mentorship offer {} -> {}", id, status);
        Ok(model)
    }

    pub async fn has_mentorship_enrollment(&self, offer_id: i64, student_id: i64) -> Result<bool> {
        Ok(mentorship_enrollment::Entity::find()
            .filter(mentorship_enrollment::Column::OfferId.eq(offer_id))
            .filter(mentorship_enrollment::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await?
            .is_some())
    }

    pub async fn list_mentorship_enrollments(
        &self,
        student_id: i64,
    ) -> Result<Vec<mentorship_enrollment::Model>> {
        Ok(mentorship_enrollment::Entity::find()
            .filter(mentorship_enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(mentorship_enrollment::Column::EnrolledAt)
            .all(&self.db)
            .await?)
    }

    // ============ 博客 ============

    pub async fn insert_blog_post(
        &self,
        title: String,
        slug: String,
        body: String,
        author_id: i64,
        category_id: Option<i64>,
        publish: bool,
    ) -> Result<blog_post::Model> {
        let now = Utc::now();
        Ok(blog_post::ActiveModel {
            title: Set(title),
            slug: Set(slug),
            body: Set(body),
            author_id: Set(author_id),
            category_id: Set(category_id),
            is_published: Set(publish),
            published_at: Set(publish.then_some(now)),
            views_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn get_blog_post_by_slug(&self, slug: &str) -> Result<Option<blog_post::Model>> {
        Ok(blog_post::Entity::find()
            .filter(blog_post::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    pub async fn list_blog_posts(
        &self,
        published_only: bool,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<blog_post::Model>, u64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        let mut find = blog_post::Entity::find();
        if published_only {
            find = find.filter(blog_post::Column::IsPublished.eq(true));
        }

        let total = find.clone().count(&self.db).await?;
        let rows = find
            .order_by_desc(blog_post::Column::CreatedAt)
            .paginate(&self.db, page_size)
            .fetch_page(page - 1)
            .await?;

        Ok((rows, total))
    }

    pub async fn update_blog_post(
        &self,
        slug: &str,
        title: Option<String>,
        body: Option<String>,
        publish: Option<bool>,
    ) -> Result<blog_post::Model> {
        let post = self
            .get_blog_post_by_slug(slug)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("文章不存在: {}", slug)))?;

        let was_published = post.is_published;
        let mut active: blog_post::ActiveModel = post.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(body) = body {
            active.body = Set(body);
        }
        if let Some(publish) = publish {
            active.is_published = Set(publish);
            if publish && !was_published {
                active.published_at = Set(Some(Utc::now()));
            }
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn increment_blog_views(&self, slug: &str) -> Result<()> {
        if let Some(post) = self.get_blog_post_by_slug(slug).await? {
            let views = post.views_count + 1;
            let mut active: blog_post::ActiveModel = post.into();
            active.views_count = Set(views);
            active.update(&self.db).await?;
        }
        Ok(())
    }
}

impl SeaOrmStorage {
    // ============ 作者删除（仅限本人的条目） ============

    pub async fn delete_job(&self, id: i64, owner_id: i64) -> Result<()> {
        let result = job::Entity::delete_many()
            .filter(job::Column::Id.eq(id))
            .filter(job::Column::PostedBy.eq(owner_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(VinajiError::not_found(format!("职位不存在: {}", id)));
        }
        self.invalidate_count_cache();
        info!("Job deleted: {}", id);
        Ok(())
    }

    pub async fn delete_course(&self, id: i64, owner_id: i64) -> Result<()> {
        let result = course::Entity::delete_many()
            .filter(course::Column::Id.eq(id))
            .filter(course::Column::InstructorId.eq(owner_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(VinajiError::not_found(format!("课程不存在: {}", id)));
        }
        self.invalidate_count_cache();
        info!("Course deleted: {}", id);
        Ok(())
    }

    pub async fn delete_product(&self, id: i64, owner_id: i64) -> Result<()> {
        let result = product::Entity::delete_many()
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::SellerId.eq(owner_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(VinajiError::not_found(format!("商品不存在: {}", id)));
        }
        self.invalidate_count_cache();
        info!("Product deleted: {}", id);
        Ok(())
    }

    pub async fn delete_mentorship_offer(&self, id: i64, owner_id: i64) -> Result<()> {
        let result = mentorship_offer::Entity::delete_many()
            .filter(mentorship_offer::Column::Id.eq(id))
            .filter(mentorship_offer::Column::MentorId.eq(owner_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(VinajiError::not_found(format!("导师服务不存在: {}", id)));
        }
        self.invalidate_count_cache();
        info!("Mentorship offer deleted: {}", id);
        Ok(())
    }

    pub async fn update_mentorship_offer(
        &self,
        updated: mentorship_offer::ActiveModel,
    ) -> Result<mentorship_offer::Model> {
        let model = updated.update(&self.db).await?;
        self.invalidate_count_cache();
        Ok(model)
    }
}

// ============ 事务内的购买写入 ============

pub async fn decrement_job_spots<C: ConnectionTrait>(conn: &C, job: job::Model) -> Result<()> {
    let spots = job.spots_left - 1;
    let mut active: job::ActiveModel = job.into();
    active.spots_left = Set(spots.max(0));
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_job_purchase<C: ConnectionTrait>(
    conn: &C,
    job_id: i64,
    buyer_id: i64,
    seller_id: i64,
    purchase_price: Decimal,
    admin_fee: Decimal,
    notes: Option<String>,
) -> Result<job_purchase::Model> {
    Ok(job_purchase::ActiveModel {
        job_id: Set(job_id),
        buyer_id: Set(buyer_id),
        seller_id: Set(seller_id),
        purchase_price: Set(purchase_price),
        admin_fee: Set(admin_fee),
        net_amount: Set(purchase_price - admin_fee),
        status: Set("completed".to_string()),
        notes: Set(notes),
        purchased_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

pub async fn decrement_course_spots<C: ConnectionTrait>(
    conn: &C,
    course: course::Model,
) -> Result<()> {
    let spots = course.spots_left - 1;
    let mut active: course::ActiveModel = course.into();
    active.spots_left = Set(spots.max(0));
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_course_enrollment<C: ConnectionTrait>(
    conn: &C,
    course_id: i64,
    student_id: i64,
    final_price: Decimal,
    admin_fee: Decimal,
    promo_code_id: Option<i64>,
) -> Result<course_enrollment::Model> {
    Ok(course_enrollment::ActiveModel {
        course_id: Set(course_id),
        student_id: Set(student_id),
        final_price: Set(final_price),
        admin_fee: Set(admin_fee),
        net_amount: Set(final_price - admin_fee),
        status: Set("active".to_string()),
        promo_code_id: Set(promo_code_id),
        enrolled_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

pub async fn increment_promo_use<C: ConnectionTrait>(
    conn: &C,
    promo: promo_code::Model,
) -> Result<()> {
    let used = promo.used_count + 1;
    let mut active: promo_code::ActiveModel = promo.into();
    active.used_count = Set(used);
    active.update(conn).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_product_sale<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    buyer_id: i64,
    seller_id: i64,
    sale_price: Decimal,
    admin_fee: Decimal,
    license_key: String,
) -> Result<product_sale::Model> {
    Ok(product_sale::ActiveModel {
        product_id: Set(product_id),
        buyer_id: Set(buyer_id),
        seller_id: Set(seller_id),
        sale_price: Set(sale_price),
        admin_fee: Set(admin_fee),
        net_amount: Set(sale_price - admin_fee),
        status: Set("completed".to_string()),
        license_key: Set(license_key),
        download_count: Set(0),
        purchased_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

pub async fn increment_offer_students<C: ConnectionTrait>(
    conn: &C,
    offer: mentorship_offer::Model,
) -> Result<()> {
    let students = offer.current_students + 1;
    let max = offer.max_students;
    let mut active: mentorship_offer::ActiveModel = offer.into();
    active.current_students = Set(students);
    if students >= max {
        active.is_available = Set(false);
    }
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_mentorship_enrollment<C: ConnectionTrait>(
    conn: &C,
    offer_id: i64,
    student_id: i64,
    requested_hours: i32,
    total_amount: Decimal,
    admin_fee: Decimal,
    application_message: Option<String>,
) -> Result<mentorship_enrollment::Model> {
    Ok(mentorship_enrollment::ActiveModel {
        offer_id: Set(offer_id),
        student_id: Set(student_id),
        requested_hours: Set(requested_hours),
        total_amount: Set(total_amount),
        admin_fee: Set(admin_fee),
        net_amount: Set(total_amount - admin_fee),
        status: Set("active".to_string()),
        tracking_id: Set(uuid::Uuid::new_v4()),
        application_message: Set(application_message),
        enrolled_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}
