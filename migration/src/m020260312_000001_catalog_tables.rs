use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 categories 表
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Name).string().not_null())
                    .col(ColumnDef::new(Category::CategoryType).string().not_null())
                    .col(ColumnDef::new(Category::Description).text().null())
                    .col(ColumnDef::new(Category::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Category::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_categories_name_type")
                    .table(Category::Table)
                    .col(Category::Name)
                    .col(Category::CategoryType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 jobs 表
        manager
            .create_table(
                Table::create()
                    .table(Job::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Job::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Job::Title).string().not_null())
                    .col(ColumnDef::new(Job::Description).text().not_null())
                    .col(ColumnDef::new(Job::CategoryId).big_integer().not_null())
                    .col(ColumnDef::new(Job::JobType).string().not_null())
                    .col(ColumnDef::new(Job::Location).string().not_null())
                    .col(ColumnDef::new(Job::CompanyName).string().not_null())
                    .col(ColumnDef::new(Job::CompanyLogoUrl).string().null())
                    .col(ColumnDef::new(Job::SalaryMin).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Job::SalaryMax).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Job::Deadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Job::SpotsTotal).integer().not_null().default(1))
                    .col(ColumnDef::new(Job::SpotsLeft).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Job::LevelRequirement)
                            .string()
                            .not_null()
                            .default("entry"),
                    )
                    .col(ColumnDef::new(Job::Price).decimal_len(12, 2).not_null().default("0"))
                    .col(ColumnDef::new(Job::PostedBy).big_integer().not_null())
                    .col(ColumnDef::new(Job::Status).string().not_null().default("draft"))
                    .col(ColumnDef::new(Job::RejectionReason).text().null())
                    .col(ColumnDef::new(Job::ViewsCount).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Job::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Job::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 job_purchases 表
        manager
            .create_table(
                Table::create()
                    .table(JobPurchase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobPurchase::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobPurchase::JobId).big_integer().not_null())
                    .col(ColumnDef::new(JobPurchase::BuyerId).big_integer().not_null())
                    .col(ColumnDef::new(JobPurchase::SellerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(JobPurchase::PurchasePrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobPurchase::AdminFee)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(JobPurchase::NetAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(JobPurchase::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(JobPurchase::Notes).text().null())
                    .col(
                        ColumnDef::new(JobPurchase::PurchasedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 防止重复购买
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_job_purchases_job_buyer")
                    .table(JobPurchase::Table)
                    .col(JobPurchase::JobId)
                    .col(JobPurchase::BuyerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 courses 表
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Course::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Course::Title).string().not_null())
                    .col(ColumnDef::new(Course::Description).text().not_null())
                    .col(ColumnDef::new(Course::CategoryId).big_integer().not_null())
                    .col(ColumnDef::new(Course::Level).string().not_null().default("beginner"))
                    .col(ColumnDef::new(Course::InstructorId).big_integer().not_null())
                    .col(ColumnDef::new(Course::Duration).integer().not_null())
                    .col(ColumnDef::new(Course::Mode).string().not_null().default("online"))
                    .col(
                        ColumnDef::new(Course::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Course::IsSelfPaced)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Course::Price).decimal_len(12, 2).not_null().default("0"))
                    .col(ColumnDef::new(Course::SpotsTotal).integer().not_null().default(1))
                    .col(ColumnDef::new(Course::SpotsLeft).integer().not_null().default(1))
                    .col(ColumnDef::new(Course::PreviewVideoUrl).string().null())
                    .col(ColumnDef::new(Course::ThumbnailUrl).string().null())
                    .col(ColumnDef::new(Course::Status).string().not_null().default("draft"))
                    .col(ColumnDef::new(Course::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Course::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 course_enrollments 表
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseEnrollment::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseEnrollment::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseEnrollment::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CourseEnrollment::FinalPrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollment::AdminFee)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollment::NetAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollment::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CourseEnrollment::PromoCodeId).big_integer().null())
                    .col(
                        ColumnDef::new(CourseEnrollment::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_enrollments_course_student")
                    .table(CourseEnrollment::Table)
                    .col(CourseEnrollment::CourseId)
                    .col(CourseEnrollment::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 products 表
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Product::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Product::Title).string().not_null())
                    .col(ColumnDef::new(Product::Description).text().not_null())
                    .col(ColumnDef::new(Product::SellerId).big_integer().not_null())
                    .col(ColumnDef::new(Product::CategoryId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Product::LicenseType)
                            .string()
                            .not_null()
                            .default("personal"),
                    )
                    .col(ColumnDef::new(Product::Version).string().not_null().default("1.0"))
                    .col(ColumnDef::new(Product::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Product::ThumbnailUrl).string().null())
                    .col(ColumnDef::new(Product::DownloadUrl).string().null())
                    .col(ColumnDef::new(Product::Features).text().null())
                    .col(ColumnDef::new(Product::Tags).string().null())
                    .col(ColumnDef::new(Product::Status).string().not_null().default("draft"))
                    .col(ColumnDef::new(Product::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Product::ViewsCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Product::DownloadCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Product::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Product::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 product_sales 表
        manager
            .create_table(
                Table::create()
                    .table(ProductSale::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductSale::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductSale::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(ProductSale::BuyerId).big_integer().not_null())
                    .col(ColumnDef::new(ProductSale::SellerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ProductSale::SalePrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductSale::AdminFee)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(ProductSale::NetAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(ProductSale::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ProductSale::LicenseKey).string().not_null())
                    .col(
                        ColumnDef::new(ProductSale::DownloadCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductSale::PurchasedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 mentorship_offers 表
        manager
            .create_table(
                Table::create()
                    .table(MentorshipOffer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MentorshipOffer::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MentorshipOffer::MentorId).big_integer().not_null())
                    .col(ColumnDef::new(MentorshipOffer::Title).string().not_null())
                    .col(ColumnDef::new(MentorshipOffer::Description).text().not_null())
                    .col(ColumnDef::new(MentorshipOffer::ExpertiseArea).string().not_null())
                    .col(
                        ColumnDef::new(MentorshipOffer::PricePerHour)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipOffer::SubscriptionRequirement)
                            .string()
                            .not_null()
                            .default("starter"),
                    )
                    .col(
                        ColumnDef::new(MentorshipOffer::MaxStudents)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(MentorshipOffer::CurrentStudents)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MentorshipOffer::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MentorshipOffer::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(MentorshipOffer::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(MentorshipOffer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipOffer::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 mentorship_enrollments 表
        manager
            .create_table(
                Table::create()
                    .table(MentorshipEnrollment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MentorshipEnrollment::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::OfferId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::RequestedHours)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::TotalAmount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::AdminFee)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::NetAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::TrackingId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::ApplicationMessage)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipEnrollment::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_mentorship_enrollments_offer_student")
                    .table(MentorshipEnrollment::Table)
                    .col(MentorshipEnrollment::OfferId)
                    .col(MentorshipEnrollment::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 promo_codes 表
        manager
            .create_table(
                Table::create()
                    .table(PromoCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromoCode::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PromoCode::Code).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(PromoCode::DiscountPercent)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(PromoCode::DiscountAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(ColumnDef::new(PromoCode::MaxUses).integer().not_null().default(1))
                    .col(ColumnDef::new(PromoCode::UsedCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(PromoCode::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PromoCode::IsActive).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        // 创建 blog_posts 表
        manager
            .create_table(
                Table::create()
                    .table(BlogPost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPost::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogPost::Title).string().not_null())
                    .col(ColumnDef::new(BlogPost::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(BlogPost::Body).text().not_null())
                    .col(ColumnDef::new(BlogPost::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(BlogPost::CategoryId).big_integer().null())
                    .col(
                        ColumnDef::new(BlogPost::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlogPost::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BlogPost::ViewsCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BlogPost::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPost::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 列表页按 (status, created_at) 过滤排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_jobs_status_created")
                    .table(Job::Table)
                    .col(Job::Status)
                    .col(Job::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_status_created")
                    .table(Course::Table)
                    .col(Course::Status)
                    .col(Course::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_status_created")
                    .table(Product::Table)
                    .col(Product::Status)
                    .col(Product::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_mentorship_offers_status_created")
                    .table(MentorshipOffer::Table)
                    .col(MentorshipOffer::Status)
                    .col(MentorshipOffer::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_mentorship_offers_status_created",
            "idx_products_status_created",
            "idx_courses_status_created",
            "idx_jobs_status_created",
        ] {
            manager.drop_index(Index::drop().name(name).to_owned()).await?;
        }
        manager
            .drop_table(Table::drop().table(BlogPost::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromoCode::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_mentorship_enrollments_offer_student")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(MentorshipEnrollment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MentorshipOffer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductSale::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_course_enrollments_course_student")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CourseEnrollment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_purchases_job_buyer").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobPurchase::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Job::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_categories_name_type").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "categories")]
    Table,
    Id,
    Name,
    CategoryType,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Job {
    #[sea_orm(iden = "jobs")]
    Table,
    Id,
    Title,
    Description,
    CategoryId,
    JobType,
    Location,
    CompanyName,
    CompanyLogoUrl,
    SalaryMin,
    SalaryMax,
    Deadline,
    SpotsTotal,
    SpotsLeft,
    LevelRequirement,
    Price,
    PostedBy,
    Status,
    RejectionReason,
    ViewsCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JobPurchase {
    #[sea_orm(iden = "job_purchases")]
    Table,
    Id,
    JobId,
    BuyerId,
    SellerId,
    PurchasePrice,
    AdminFee,
    NetAmount,
    Status,
    Notes,
    PurchasedAt,
}

#[derive(DeriveIden)]
enum Course {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Title,
    Description,
    CategoryId,
    Level,
    InstructorId,
    Duration,
    Mode,
    StartDate,
    IsSelfPaced,
    Price,
    SpotsTotal,
    SpotsLeft,
    PreviewVideoUrl,
    ThumbnailUrl,
    Status,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseEnrollment {
    #[sea_orm(iden = "course_enrollments")]
    Table,
    Id,
    CourseId,
    StudentId,
    FinalPrice,
    AdminFee,
    NetAmount,
    Status,
    PromoCodeId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Product {
    #[sea_orm(iden = "products")]
    Table,
    Id,
    Title,
    Description,
    SellerId,
    CategoryId,
    LicenseType,
    Version,
    Price,
    ThumbnailUrl,
    DownloadUrl,
    Features,
    Tags,
    Status,
    RejectionReason,
    ViewsCount,
    DownloadCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductSale {
    #[sea_orm(iden = "product_sales")]
    Table,
    Id,
    ProductId,
    BuyerId,
    SellerId,
    SalePrice,
    AdminFee,
    NetAmount,
    Status,
    LicenseKey,
    DownloadCount,
    PurchasedAt,
}

#[derive(DeriveIden)]
enum MentorshipOffer {
    #[sea_orm(iden = "mentorship_offers")]
    Table,
    Id,
    MentorId,
    Title,
    Description,
    ExpertiseArea,
    PricePerHour,
    SubscriptionRequirement,
    MaxStudents,
    CurrentStudents,
    IsAvailable,
    Status,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MentorshipEnrollment {
    #[sea_orm(iden = "mentorship_enrollments")]
    Table,
    Id,
    OfferId,
    StudentId,
    RequestedHours,
    TotalAmount,
    AdminFee,
    NetAmount,
    Status,
    TrackingId,
    ApplicationMessage,
    EnrolledAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum PromoCode {
    #[sea_orm(iden = "promo_codes")]
    Table,
    Id,
    Code,
    DiscountPercent,
    DiscountAmount,
    MaxUses,
    UsedCount,
    ValidUntil,
    IsActive,
}

#[derive(DeriveIden)]
enum BlogPost {
    #[sea_orm(iden = "blog_posts")]
    Table,
    Id,
    Title,
    Slug,
    Body,
    AuthorId,
    CategoryId,
    IsPublished,
    PublishedAt,
    ViewsCount,
    CreatedAt,
    UpdatedAt,
}
