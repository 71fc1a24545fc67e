use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 users 表
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(User::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(User::PasswordHash).string().not_null())
                    .col(ColumnDef::new(User::FirstName).string().null())
                    .col(ColumnDef::new(User::LastName).string().null())
                    .col(
                        ColumnDef::new(User::SubscriptionLevel)
                            .string()
                            .not_null()
                            .default("starter"),
                    )
                    .col(
                        ColumnDef::new(User::ReferralCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::IsVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::IsStaff).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(User::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::DateUpdated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 user_profiles 表
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfile::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserProfile::Bio).text().null())
                    .col(ColumnDef::new(UserProfile::ProfilePictureUrl).string().null())
                    .col(ColumnDef::new(UserProfile::Country).string().null())
                    .col(ColumnDef::new(UserProfile::PhoneNumber).string().null())
                    .col(ColumnDef::new(UserProfile::ReferredBy).big_integer().null())
                    .col(
                        ColumnDef::new(UserProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 password_reset_tokens 表
        manager
            .create_table(
                Table::create()
                    .table(PasswordResetToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PasswordResetToken::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::Token)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 bank_accounts 表
        manager
            .create_table(
                Table::create()
                    .table(BankAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccount::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAccount::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BankAccount::BankName).string().not_null())
                    .col(ColumnDef::new(BankAccount::AccountNumber).string().not_null())
                    .col(ColumnDef::new(BankAccount::AccountName).string().not_null())
                    .col(
                        ColumnDef::new(BankAccount::AccountType)
                            .string()
                            .not_null()
                            .default("savings"),
                    )
                    .col(
                        ColumnDef::new(BankAccount::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BankAccount::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BankAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 crypto_wallets 表
        manager
            .create_table(
                Table::create()
                    .table(CryptoWallet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CryptoWallet::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CryptoWallet::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CryptoWallet::CryptoType).string().not_null())
                    .col(ColumnDef::new(CryptoWallet::WalletAddress).string().not_null())
                    .col(ColumnDef::new(CryptoWallet::Network).string().null())
                    .col(
                        ColumnDef::new(CryptoWallet::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CryptoWallet::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 一个地址每用户只能绑定一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_crypto_wallets_user_address")
                    .table(CryptoWallet::Table)
                    .col(CryptoWallet::UserId)
                    .col(CryptoWallet::WalletAddress)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_crypto_wallets_user_address").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CryptoWallet::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccount::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PasswordResetToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    SubscriptionLevel,
    ReferralCode,
    IsVerified,
    IsStaff,
    IsActive,
    DateJoined,
    DateUpdated,
}

#[derive(DeriveIden)]
enum UserProfile {
    #[sea_orm(iden = "user_profiles")]
    Table,
    Id,
    UserId,
    Bio,
    ProfilePictureUrl,
    Country,
    PhoneNumber,
    ReferredBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PasswordResetToken {
    #[sea_orm(iden = "password_reset_tokens")]
    Table,
    Id,
    UserId,
    Token,
    CreatedAt,
    ExpiresAt,
    IsUsed,
}

#[derive(DeriveIden)]
enum BankAccount {
    #[sea_orm(iden = "bank_accounts")]
    Table,
    Id,
    UserId,
    BankName,
    AccountNumber,
    AccountName,
    AccountType,
    IsPrimary,
    IsVerified,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CryptoWallet {
    #[sea_orm(iden = "crypto_wallets")]
    Table,
    Id,
    UserId,
    CryptoType,
    WalletAddress,
    Network,
    IsPrimary,
    CreatedAt,
}
