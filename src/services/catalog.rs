//! Catalog business logic: listing lifecycle and purchase orchestration.
//!
//! Purchases pair the ledger rows and the domain purchase record inside a
//! single database transaction (`record_purchase_on` + the catalog insert
//! helpers share the connection).

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::TransactionTrait;
use serde_json::json;
use tracing::info;

use crate::errors::{Result, VinajiError};
use crate::services::ledger::{FeeSchedule, PurchaseRequest, record_purchase_on};
use crate::storage::backend::catalog::{
    self, NewCourse, NewJob, NewMentorshipOffer, NewProduct,
};
use crate::storage::models::profile_is_complete;
use crate::storage::{ListingStatus, SaleKind, SeaOrmStorage, SubscriptionLevel};
use crate::utils::generate_license_key;

use migration::entities::{
    course, course_enrollment, job, job_purchase, mentorship_enrollment, mentorship_offer, product,
    product_sale, promo_code,
};

/// 职位编辑字段；None 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub price: Option<Decimal>,
    pub deadline: Option<chrono::DateTime<Utc>>,
}

/// 课程 / 商品 / 导师服务共用的基础编辑字段
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

pub struct CatalogService {
    storage: Arc<SeaOrmStorage>,
}

impl CatalogService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 发布内容要求档案完整
    async fn ensure_can_post(&self, user_id: i64) -> Result<()> {
        let profile = self
            .storage
            .get_profile(user_id)
            .await?
            .ok_or_else(|| VinajiError::not_found("档案不存在"))?;
        if !profile_is_complete(&profile) {
            return Err(VinajiError::forbidden(
                "Complete your profile (bio, country, phone) before posting content",
            ));
        }
        Ok(())
    }

    async fn ensure_category(&self, category_id: i64, expected_type: &str) -> Result<()> {
        let category = self
            .storage
            .find_category(category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| VinajiError::validation(format!("分类不存在: {}", category_id)))?;
        if category.category_type != expected_type {
            return Err(VinajiError::validation(format!(
                "分类 {} 不适用于 {}",
                category.name, expected_type
            )));
        }
        Ok(())
    }

    // ============ 职位 ============

    pub async fn create_job(&self, new: NewJob) -> Result<job::Model> {
        let settings = self.storage.site_settings().await?;
        if settings.pause_job_uploading {
            return Err(VinajiError::forbidden("职位发布已暂停"));
        }

        self.ensure_can_post(new.posted_by).await?;
        self.ensure_category(new.category_id, "job").await?;

        if new.salary_min > new.salary_max {
            return Err(VinajiError::validation("薪资下限不能高于上限"));
        }
        if new.deadline <= Utc::now() {
            return Err(VinajiError::validation("截止时间必须在未来"));
        }
        if new.spots_total < 1 {
            return Err(VinajiError::validation("名额至少为 1"));
        }
        if new.price < Decimal::ZERO {
            return Err(VinajiError::validation("价格不能为负"));
        }

        self.storage.insert_job(new).await
    }

    /// 作者编辑自己的职位；已售出前可改，改动后重回待审
    pub async fn update_job(&self, owner_id: i64, job_id: i64, patch: JobPatch) -> Result<job::Model> {
        let job = self
            .storage
            .get_job(job_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("职位不存在: {}", job_id)))?;
        if job.posted_by != owner_id {
            return Err(VinajiError::forbidden("只能编辑自己发布的职位"));
        }

        if let Some(category_id) = patch.category_id {
            self.ensure_category(category_id, "job").await?;
        }

        let mut active: job::ActiveModel = job.into();
        if let Some(title) = patch.title {
            active.title = sea_orm::Set(title);
        }
        if let Some(description) = patch.description {
            active.description = sea_orm::Set(description);
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = sea_orm::Set(category_id);
        }
        if let Some(job_type) = patch.job_type {
            active.job_type = sea_orm::Set(job_type);
        }
        if let Some(location) = patch.location {
            active.location = sea_orm::Set(location);
        }
        if let Some(price) = patch.price {
            if price < Decimal::ZERO {
                return Err(VinajiError::validation("价格不能为负"));
            }
            active.price = sea_orm::Set(price);
        }
        if let Some(deadline) = patch.deadline {
            if deadline <= Utc::now() {
                return Err(VinajiError::validation("截止时间必须在未来"));
            }
            active.deadline = sea_orm::Set(deadline);
        }
        // 编辑后重新进入审核
        active.status = sea_orm::Set(ListingStatus::Pending.to_string());
        active.rejection_reason = sea_orm::Set(None);
        active.updated_at = sea_orm::Set(Utc::now());

        self.storage.update_job(active).await
    }

    pub async fn delete_job(&self, owner_id: i64, job_id: i64) -> Result<()> {
        self.storage.delete_job(job_id, owner_id).await
    }

    /// 职位是否可购买
    fn job_is_active(job: &job::Model) -> bool {
        job.status == ListingStatus::Approved.to_string()
            && job.spots_left > 0
            && job.deadline > Utc::now()
    }

    pub async fn purchase_job(
        &self,
        buyer_id: i64,
        job_id: i64,
        notes: Option<String>,
    ) -> Result<job_purchase::Model> {
        let job = self
            .storage
            .get_job(job_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("职位不存在: {}", job_id)))?;

        if !Self::job_is_active(&job) {
            return Err(VinajiError::validation("职位不可购买（未上架、名额已满或已截止）"));
        }
        if job.posted_by == buyer_id {
            return Err(VinajiError::validation("不能购买自己发布的职位"));
        }
        if self.storage.has_job_purchase(job_id, buyer_id).await? {
            return Err(VinajiError::conflict("已购买过该职位"));
        }

        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        let admin_fee = fees.sale_fee(SaleKind::Job, job.price);

        let txn = self.storage.get_db().begin().await?;

        if job.price > Decimal::ZERO {
            record_purchase_on(
                &txn,
                &settings,
                &PurchaseRequest {
                    buyer_id,
                    seller_id: job.posted_by,
                    gross: job.price,
                    kind: SaleKind::Job,
                    description: format!("Job purchase: {}", job.title),
                    metadata: Some(json!({ "job_id": job.id })),
                },
            )
            .await?;
        }

        let purchase = catalog::insert_job_purchase(
            &txn,
            job.id,
            buyer_id,
            job.posted_by,
            job.price,
            if job.price > Decimal::ZERO { admin_fee } else { Decimal::ZERO },
            notes,
        )
        .await?;
        catalog::decrement_job_spots(&txn, job).await?;

        txn.commit().await?;
        info!("Job {} purchased by user {}", job_id, buyer_id);
        Ok(purchase)
    }

    // ============ 课程 ============

    pub async fn create_course(&self, new: NewCourse) -> Result<course::Model> {
        let settings = self.storage.site_settings().await?;
        if settings.pause_course_uploading {
            return Err(VinajiError::forbidden("课程发布已暂停"));
        }

        self.ensure_can_post(new.instructor_id).await?;
        self.ensure_category(new.category_id, "course").await?;

        if new.duration < 1 {
            return Err(VinajiError::validation("课时至少为 1 小时"));
        }
        if new.spots_total < 1 {
            return Err(VinajiError::validation("名额至少为 1"));
        }
        if new.price < Decimal::ZERO {
            return Err(VinajiError::validation("价格不能为负"));
        }

        self.storage.insert_course(new).await
    }

    /// 讲师编辑自己的课程；改动后重回待审
    pub async fn update_course(
        &self,
        owner_id: i64,
        course_id: i64,
        patch: ListingPatch,
    ) -> Result<course::Model> {
        let course = self
            .storage
            .get_course(course_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("课程不存在: {}", course_id)))?;
        if course.instructor_id != owner_id {
            return Err(VinajiError::forbidden("只能编辑自己的课程"));
        }

        let mut active: course::ActiveModel = course.into();
        if let Some(title) = patch.title {
            active.title = sea_orm::Set(title);
        }
        if let Some(description) = patch.description {
            active.description = sea_orm::Set(description);
        }
        if let Some(price) = patch.price {
            if price < Decimal::ZERO {
                return Err(VinajiError::validation("价格不能为负"));
            }
            active.price = sea_orm::Set(price);
        }
        active.status = sea_orm::Set(ListingStatus::Pending.to_string());
        active.rejection_reason = sea_orm::Set(None);
        active.updated_at = sea_orm::Set(Utc::now());

        self.storage.update_course(active).await
    }

    pub async fn delete_course(&self, owner_id: i64, course_id: i64) -> Result<()> {
        self.storage.delete_course(course_id, owner_id).await
    }

    fn course_is_available(course: &course::Model) -> bool {
        course.status == ListingStatus::Approved.to_string()
            && course.spots_left > 0
            && (course.is_self_paced || course.start_date > Utc::now())
    }

    /// 校验促销码并计算到手价
    fn apply_promo(price: Decimal, promo: &promo_code::Model) -> Result<Decimal> {
        let usable =
            promo.is_active && promo.used_count < promo.max_uses && promo.valid_until > Utc::now();
        if !usable {
            return Err(VinajiError::validation("促销码无效或已过期"));
        }

        let discount = if promo.discount_percent > Decimal::ZERO {
            FeeSchedule::pct_of(price, promo.discount_percent)
        } else {
            promo.discount_amount
        };
        Ok((price - discount).max(Decimal::ZERO))
    }

    pub async fn enroll_course(
        &self,
        student_id: i64,
        course_id: i64,
        promo_code: Option<String>,
    ) -> Result<course_enrollment::Model> {
        let course = self
            .storage
            .get_course(course_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("课程不存在: {}", course_id)))?;

        if !Self::course_is_available(&course) {
            return Err(VinajiError::validation("课程不可报名（未上架、名额已满或已开课）"));
        }
        if course.instructor_id == student_id {
            return Err(VinajiError::validation("不能报名自己的课程"));
        }
        if self.storage.has_course_enrollment(course_id, student_id).await? {
            return Err(VinajiError::conflict("已报名过该课程"));
        }

        let promo = match promo_code {
            Some(ref code) => Some(
                self.storage
                    .find_promo_by_code(code)
                    .await?
                    .ok_or_else(|| VinajiError::validation("促销码不存在"))?,
            ),
            None => None,
        };

        let final_price = match promo.as_ref() {
            Some(promo) => Self::apply_promo(course.price, promo)?,
            None => course.price,
        };

        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        let admin_fee = if final_price > Decimal::ZERO {
            fees.sale_fee(SaleKind::Course, final_price)
        } else {
            Decimal::ZERO
        };

        let txn = self.storage.get_db().begin().await?;

        if final_price > Decimal::ZERO {
            record_purchase_on(
                &txn,
                &settings,
                &PurchaseRequest {
                    buyer_id: student_id,
                    seller_id: course.instructor_id,
                    gross: final_price,
                    kind: SaleKind::Course,
                    description: format!("Course enrollment: {}", course.title),
                    metadata: Some(json!({
                        "course_id": course.id,
                        "promo_code": promo.as_ref().map(|p| p.code.clone()),
                    })),
                },
            )
            .await?;
        }

        let enrollment = catalog::insert_course_enrollment(
            &txn,
            course.id,
            student_id,
            final_price,
            admin_fee,
            promo.as_ref().map(|p| p.id),
        )
        .await?;

        if let Some(promo) = promo {
            catalog::increment_promo_use(&txn, promo).await?;
        }
        catalog::decrement_course_spots(&txn, course).await?;

        txn.commit().await?;
        info!("Course {} enrollment by user {}", course_id, student_id);
        Ok(enrollment)
    }

    // ============ 商品 ============

    pub async fn create_product(&self, new: NewProduct) -> Result<product::Model> {
        self.ensure_can_post(new.seller_id).await?;
        self.ensure_category(new.category_id, "product").await?;

        if new.price <= Decimal::ZERO {
            return Err(VinajiError::validation("商品价格必须大于零"));
        }

        self.storage.insert_product(new).await
    }

    /// 卖家编辑自己的商品；改动后重回待审
    pub async fn update_product(
        &self,
        owner_id: i64,
        product_id: i64,
        patch: ListingPatch,
    ) -> Result<product::Model> {
        let product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("商品不存在: {}", product_id)))?;
        if product.seller_id != owner_id {
            return Err(VinajiError::forbidden("只能编辑自己的商品"));
        }

        let mut active: product::ActiveModel = product.into();
        if let Some(title) = patch.title {
            active.title = sea_orm::Set(title);
        }
        if let Some(description) = patch.description {
            active.description = sea_orm::Set(description);
        }
        if let Some(price) = patch.price {
            if price <= Decimal::ZERO {
                return Err(VinajiError::validation("商品价格必须大于零"));
            }
            active.price = sea_orm::Set(price);
        }
        active.status = sea_orm::Set(ListingStatus::Pending.to_string());
        active.rejection_reason = sea_orm::Set(None);
        active.updated_at = sea_orm::Set(Utc::now());

        self.storage.update_product(active).await
    }

    pub async fn delete_product(&self, owner_id: i64, product_id: i64) -> Result<()> {
        self.storage.delete_product(product_id, owner_id).await
    }

    pub async fn purchase_product(
        &self,
        buyer_id: i64,
        product_id: i64,
    ) -> Result<product_sale::Model> {
        let product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("商品不存在: {}", product_id)))?;

        if product.status != ListingStatus::Approved.to_string() {
            return Err(VinajiError::validation("商品未上架"));
        }
        if product.seller_id == buyer_id {
            return Err(VinajiError::validation("不能购买自己的商品"));
        }

        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        let admin_fee = fees.sale_fee(SaleKind::Product, product.price);

        let txn = self.storage.get_db().begin().await?;

        record_purchase_on(
            &txn,
            &settings,
            &PurchaseRequest {
                buyer_id,
                seller_id: product.seller_id,
                gross: product.price,
                kind: SaleKind::Product,
                description: format!("Product purchase: {}", product.title),
                metadata: Some(json!({ "product_id": product.id })),
            },
        )
        .await?;

        let sale = catalog::insert_product_sale(
            &txn,
            product.id,
            buyer_id,
            product.seller_id,
            product.price,
            admin_fee,
            generate_license_key(),
        )
        .await?;

        txn.commit().await?;
        info!("Product {} purchased by user {}", product_id, buyer_id);
        Ok(sale)
    }

    // ============ 导师服务 ============

    pub async fn create_mentorship_offer(
        &self,
        new: NewMentorshipOffer,
    ) -> Result<mentorship_offer::Model> {
        self.ensure_can_post(new.mentor_id).await?;

        if new.price_per_hour <= Decimal::ZERO {
            return Err(VinajiError::validation("时薪必须大于零"));
        }
        if new.max_students < 1 {
            return Err(VinajiError::validation("学员名额至少为 1"));
        }

        self.storage.insert_mentorship_offer(new).await
    }

    /// 导师编辑自己的服务；改动后重回待审（price 字段映射时薪）
    pub async fn update_mentorship_offer(
        &self,
        owner_id: i64,
        offer_id: i64,
        patch: ListingPatch,
    ) -> Result<mentorship_offer::Model> {
        let offer = self
            .storage
            .get_mentorship_offer(offer_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("导师服务不存在: {}", offer_id)))?;
        if offer.mentor_id != owner_id {
            return Err(VinajiError::forbidden("只能编辑自己的导师服务"));
        }

        let mut active: mentorship_offer::ActiveModel = offer.into();
        if let Some(title) = patch.title {
            active.title = sea_orm::Set(title);
        }
        if let Some(description) = patch.description {
            active.description = sea_orm::Set(description);
        }
        if let Some(price) = patch.price {
            if price <= Decimal::ZERO {
                return Err(VinajiError::validation("时薪必须大于零"));
            }
            active.price_per_hour = sea_orm::Set(price);
        }
        active.status = sea_orm::Set(ListingStatus::Pending.to_string());
        active.rejection_reason = sea_orm::Set(None);
        active.updated_at = sea_orm::Set(Utc::now());

        self.storage.update_mentorship_offer(active).await
    }

    pub async fn delete_mentorship_offer(&self, owner_id: i64, offer_id: i64) -> Result<()> {
        self.storage.delete_mentorship_offer(offer_id, owner_id).await
    }

    pub async fn enroll_mentorship(
        &self,
        student_id: i64,
        student_level: SubscriptionLevel,
        offer_id: i64,
        requested_hours: i32,
        application_message: Option<String>,
    ) -> Result<mentorship_enrollment::Model> {
        if requested_hours < 1 {
            return Err(VinajiError::validation("时长至少为 1 小时"));
        }

        let offer = self
            .storage
            .get_mentorship_offer(offer_id)
            .await?
            .ok_or_else(|| VinajiError::not_found(format!("导师服务不存在: {}", offer_id)))?;

        if offer.status != ListingStatus::Approved.to_string() || !offer.is_available {
            return Err(VinajiError::validation("导师服务不可报名"));
        }
        if offer.current_students >= offer.max_students {
            return Err(VinajiError::validation("导师学员名额已满"));
        }
        if offer.mentor_id == student_id {
            return Err(VinajiError::validation("不能报名自己的导师服务"));
        }
        if self.storage.has_mentorship_enrollment(offer_id, student_id).await? {
            return Err(VinajiError::conflict("已报名过该导师服务"));
        }

        // 订阅档位门槛
        let required: SubscriptionLevel = offer
            .subscription_requirement
            .parse()
            .unwrap_or_default();
        if student_level < required {
            return Err(VinajiError::forbidden(format!(
                "该导师服务要求 {} 及以上订阅",
                required
            )));
        }

        let total = offer.price_per_hour * Decimal::from(requested_hours);
        let settings = self.storage.site_settings().await?;
        let fees = FeeSchedule::from_settings(&settings);
        let admin_fee = fees.sale_fee(SaleKind::Mentorship, total);

        let txn = self.storage.get_db().begin().await?;

        record_purchase_on(
            &txn,
            &settings,
            &PurchaseRequest {
                buyer_id: student_id,
                seller_id: offer.mentor_id,
                gross: total,
                kind: SaleKind::Mentorship,
                description: format!("Mentorship enrollment: {}", offer.title),
                metadata: Some(json!({
                    "offer_id": offer.id,
                    "requested_hours": requested_hours,
                })),
            },
        )
        .await?;

        let enrollment = catalog::insert_mentorship_enrollment(
            &txn,
            offer.id,
            student_id,
            requested_hours,
            total,
            admin_fee,
            application_message,
        )
        .await?;
        catalog::increment_offer_students(&txn, offer).await?;

        txn.commit().await?;
        info!("Mentorship offer {} enrollment by user {}", offer_id, student_id);
        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn promo(percent: Decimal, amount: Decimal, used: i32, max: i32) -> promo_code::Model {
        promo_code::Model {
            id: 1,
            code: "WELCOME".to_string(),
            discount_percent: percent,
            discount_amount: amount,
            max_uses: max,
            used_count: used,
            valid_until: Utc::now() + chrono::Duration::days(1),
            is_active: true,
        }
    }

    #[test]
    fn test_apply_promo_percent() {
        let promo = promo(dec!(10), dec!(0), 0, 5);
        assert_eq!(
            CatalogService::apply_promo(dec!(2000), &promo).unwrap(),
            dec!(1800)
        );
    }

    #[test]
    fn test_apply_promo_fixed_amount() {
        let promo = promo(dec!(0), dec!(500), 0, 5);
        assert_eq!(
            CatalogService::apply_promo(dec!(2000), &promo).unwrap(),
            dec!(1500)
        );
    }

    #[test]
    fn test_apply_promo_never_negative() {
        let promo = promo(dec!(0), dec!(5000), 0, 5);
        assert_eq!(
            CatalogService::apply_promo(dec!(2000), &promo).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_apply_promo_exhausted() {
        let promo = promo(dec!(10), dec!(0), 5, 5);
        assert!(CatalogService::apply_promo(dec!(2000), &promo).is_err());
    }
}
