//! Catalog workflow tests: moderation gates, purchase flows, promo codes,
//! capacity limits and subscription-tier requirements.

mod common;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{complete_profile, create_category, create_user, fund_wallet, test_storage};
use vinaji::services::{CatalogService, LedgerService};
use vinaji::storage::backend::catalog::{NewCourse, NewJob, NewMentorshipOffer, NewProduct};
use vinaji::storage::{ListingQuery, ListingStatus, SubscriptionLevel};

fn new_job(category_id: i64, posted_by: i64, price: Decimal) -> NewJob {
    NewJob {
        title: "Backend engineer".to_string(),
        description: "Build the ledger".to_string(),
        category_id,
        job_type: "full_time".to_string(),
        location: "Lagos".to_string(),
        company_name: "Acme NG".to_string(),
        company_logo_url: None,
        salary_min: dec!(300000),
        salary_max: dec!(500000),
        deadline: Utc::now() + Duration::days(14),
        spots_total: 2,
        level_requirement: "mid".to_string(),
        price,
        posted_by,
    }
}

fn new_course(category_id: i64, instructor_id: i64, price: Decimal) -> NewCourse {
    NewCourse {
        title: "Rust for fintech".to_string(),
        description: "Decimal all the things".to_string(),
        category_id,
        level: "intermediate".to_string(),
        instructor_id,
        duration: 12,
        mode: "online".to_string(),
        start_date: Utc::now() + Duration::days(7),
        is_self_paced: false,
        price,
        spots_total: 3,
        preview_video_url: None,
        thumbnail_url: None,
    }
}

fn new_product(category_id: i64, seller_id: i64) -> NewProduct {
    NewProduct {
        title: "Invoice template pack".to_string(),
        description: "Twenty templates".to_string(),
        seller_id,
        category_id,
        license_type: "personal".to_string(),
        version: "1.0".to_string(),
        price: dec!(1500),
        thumbnail_url: None,
        download_url: Some("https://cdn.example.com/pack.zip".to_string()),
        features: Some("Editable\nPrint-ready".to_string()),
        tags: Some("invoice,template".to_string()),
    }
}

#[tokio::test]
async fn test_incomplete_profile_cannot_post() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "newbie", None).await;
    let category = create_category(&storage, "Engineering", "job").await;

    let catalog = CatalogService::new(storage.clone());
    let result = catalog.create_job(new_job(category, user.id, dec!(0))).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_category_type_must_match() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "poster", None).await;
    complete_profile(&storage, user.id).await;
    let course_category = create_category(&storage, "Design", "course").await;

    let catalog = CatalogService::new(storage.clone());
    let result = catalog
        .create_job(new_job(course_category, user.id, dec!(0)))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_listing_moderation_workflow() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "vendor", None).await;
    complete_profile(&storage, user.id).await;
    let category = create_category(&storage, "Engineering", "job").await;

    let catalog = CatalogService::new(storage.clone());
    let job = catalog.create_job(new_job(category, user.id, dec!(0))).await.unwrap();
    assert_eq!(job.status, "pending");

    // 未过审不出现在公开列表
    let (rows, total) = storage.list_jobs(ListingQuery::default()).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);

    storage
        .set_job_status(job.id, ListingStatus::Approved, None)
        .await
        .unwrap();

    let (rows, total) = storage.list_jobs(ListingQuery::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(total, 1);

    // owner 视角能看到全部状态
    let (mine, _) = storage
        .list_jobs(ListingQuery {
            owner_id: Some(user.id),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn test_job_purchase_flow() {
    let (storage, _dir) = test_storage().await;
    let seller = create_user(&storage, "seller", None).await;
    let buyer = create_user(&storage, "buyer", None).await;
    complete_profile(&storage, seller.id).await;
    let category = create_category(&storage, "Engineering", "job").await;

    let catalog = CatalogService::new(storage.clone());
    let ledger = LedgerService::new(storage.clone());

    let job = catalog
        .create_job(new_job(category, seller.id, dec!(2000)))
        .await
        .unwrap();
    storage
        .set_job_status(job.id, ListingStatus::Approved, None)
        .await
        .unwrap();

    fund_wallet(&storage, buyer.id, dec!(5000)).await;

    let purchase = catalog.purchase_job(buyer.id, job.id, None).await.unwrap();
    assert_eq!(purchase.purchase_price, dec!(2000));
    // 默认职位费率 2%
    assert_eq!(purchase.admin_fee, dec!(40));
    assert_eq!(purchase.net_amount, dec!(1960));

    // 名额扣减
    let job = storage.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.spots_left, 1);

    // 钱包两侧对账
    assert_eq!(ledger.balance(buyer.id).await.unwrap().available, dec!(3000));
    assert_eq!(ledger.balance(seller.id).await.unwrap().available, dec!(1960));

    // 不能重复购买
    assert!(catalog.purchase_job(buyer.id, job.id, None).await.is_err());
    // 不能购买自己的
    assert!(catalog.purchase_job(seller.id, job.id, None).await.is_err());
}

#[tokio::test]
async fn test_course_enrollment_with_promo() {
    let (storage, _dir) = test_storage().await;
    let instructor = create_user(&storage, "teacher1", None).await;
    let student = create_user(&storage, "student", None).await;
    complete_profile(&storage, instructor.id).await;
    let category = create_category(&storage, "Programming", "course").await;

    let catalog = CatalogService::new(storage.clone());
    let ledger = LedgerService::new(storage.clone());

    let course = catalog
        .create_course(new_course(category, instructor.id, dec!(2000)))
        .await
        .unwrap();
    storage
        .set_course_status(course.id, ListingStatus::Approved, None)
        .await
        .unwrap();

    storage
        .create_promo_code(
            "LAUNCH10".to_string(),
            dec!(10),
            dec!(0),
            5,
            Utc::now() + Duration::days(30),
        )
        .await
        .unwrap();

    fund_wallet(&storage, student.id, dec!(5000)).await;

    let enrollment = catalog
        .enroll_course(student.id, course.id, Some("LAUNCH10".to_string()))
        .await
        .unwrap();

    // 10% 折扣 → 1800；课程费率 3% → 54
    assert_eq!(enrollment.final_price, dec!(1800));
    assert_eq!(enrollment.admin_fee, dec!(54));

    let promo = storage.find_promo_by_code("LAUNCH10").await.unwrap().unwrap();
    assert_eq!(promo.used_count, 1);

    assert_eq!(
        ledger.balance(student.id).await.unwrap().available,
        dec!(3200)
    );

    // 重复报名被拒
    assert!(catalog.enroll_course(student.id, course.id, None).await.is_err());
}

#[tokio::test]
async fn test_expired_promo_rejected() {
    let (storage, _dir) = test_storage().await;
    let instructor = create_user(&storage, "teacher2", None).await;
    let student = create_user(&storage, "student2", None).await;
    complete_profile(&storage, instructor.id).await;
    let category = create_category(&storage, "Programming", "course").await;

    let catalog = CatalogService::new(storage.clone());
    let course = catalog
        .create_course(new_course(category, instructor.id, dec!(2000)))
        .await
        .unwrap();
    storage
        .set_course_status(course.id, ListingStatus::Approved, None)
        .await
        .unwrap();

    storage
        .create_promo_code(
            "EXPIRED".to_string(),
            dec!(50),
            dec!(0),
            5,
            Utc::now() - Duration::days(1),
        )
        .await
        .unwrap();

    fund_wallet(&storage, student.id, dec!(5000)).await;
    assert!(
        catalog
            .enroll_course(student.id, course.id, Some("EXPIRED".to_string()))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_product_purchase_generates_license_key() {
    let (storage, _dir) = test_storage().await;
    let seller = create_user(&storage, "maker", None).await;
    let buyer = create_user(&storage, "collector", None).await;
    complete_profile(&storage, seller.id).await;
    let category = create_category(&storage, "Templates", "product").await;

    let catalog = CatalogService::new(storage.clone());
    let product = catalog
        .create_product(new_product(category, seller.id))
        .await
        .unwrap();
    storage
        .set_product_status(product.id, ListingStatus::Approved, None)
        .await
        .unwrap();

    fund_wallet(&storage, buyer.id, dec!(5000)).await;
    let sale = catalog.purchase_product(buyer.id, product.id).await.unwrap();

    assert_eq!(sale.license_key.len(), 16);
    // 默认商品费率 2.5%
    assert_eq!(sale.admin_fee, dec!(37.50));
    assert_eq!(sale.net_amount, dec!(1462.50));
}

#[tokio::test]
async fn test_mentorship_requires_subscription_tier() {
    let (storage, _dir) = test_storage().await;
    let mentor = create_user(&storage, "mentor", None).await;
    let student = create_user(&storage, "mentee", None).await;
    complete_profile(&storage, mentor.id).await;

    let catalog = CatalogService::new(storage.clone());
    let offer = catalog
        .create_mentorship_offer(NewMentorshipOffer {
            mentor_id: mentor.id,
            title: "Ledger design review".to_string(),
            description: "One on one".to_string(),
            expertise_area: "Fintech backends".to_string(),
            price_per_hour: dec!(500),
            subscription_requirement: "pro".to_string(),
            max_students: 1,
        })
        .await
        .unwrap();
    storage
        .set_mentorship_offer_status(offer.id, ListingStatus::Approved, None)
        .await
        .unwrap();

    fund_wallet(&storage, student.id, dec!(10000)).await;

    // starter 档位被挡
    assert!(
        catalog
            .enroll_mentorship(student.id, SubscriptionLevel::Starter, offer.id, 2, None)
            .await
            .is_err()
    );

    // pro 档位可报名，金额 = 小时 × 时薪
    let enrollment = catalog
        .enroll_mentorship(student.id, SubscriptionLevel::Pro, offer.id, 2, None)
        .await
        .unwrap();
    assert_eq!(enrollment.total_amount, dec!(1000));
    // 默认导师费率 5%
    assert_eq!(enrollment.admin_fee, dec!(50));

    // 名额占满后服务下架
    let offer = storage.get_mentorship_offer(offer.id).await.unwrap().unwrap();
    assert_eq!(offer.current_students, 1);
    assert!(!offer.is_available);

    // 名额已满，其他学员被拒
    let another = create_user(&storage, "late", None).await;
    fund_wallet(&storage, another.id, dec!(10000)).await;
    assert!(
        catalog
            .enroll_mentorship(another.id, SubscriptionLevel::Pro, offer.id, 1, None)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_paused_uploading_blocks_creation() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "paused", None).await;
    complete_profile(&storage, user.id).await;
    let category = create_category(&storage, "Engineering", "job").await;

    storage
        .update_site_settings(vinaji::storage::backend::settings::SettingsPatch {
            pause_job_uploading: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    let catalog = CatalogService::new(storage.clone());
    assert!(catalog.create_job(new_job(category, user.id, dec!(0))).await.is_err());
}

#[tokio::test]
async fn test_search_filters_listings() {
    let (storage, _dir) = test_storage().await;
    let user = create_user(&storage, "searcher", None).await;
    complete_profile(&storage, user.id).await;
    let category = create_category(&storage, "Engineering", "job").await;

    let catalog = CatalogService::new(storage.clone());
    let mut job_a = new_job(category, user.id, dec!(0));
    job_a.title = "Senior Rust engineer".to_string();
    let mut job_b = new_job(category, user.id, dec!(0));
    job_b.title = "Frontend developer".to_string();

    let a = catalog.create_job(job_a).await.unwrap();
    let b = catalog.create_job(job_b).await.unwrap();
    storage.set_job_status(a.id, ListingStatus::Approved, None).await.unwrap();
    storage.set_job_status(b.id, ListingStatus::Approved, None).await.unwrap();

    let (rows, total) = storage
        .list_jobs(ListingQuery {
            search: Some("rust".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(rows[0].title, "Senior Rust engineer");
}
