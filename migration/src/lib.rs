pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m020260301_000001_accounts_tables;
mod m020260301_000002_wallet_tables;
mod m020260305_000001_kyc_tables;
mod m020260312_000001_catalog_tables;
mod m020260318_000001_affiliate_subscription_tables;
mod m020260322_000001_wallet_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m020260301_000001_accounts_tables::Migration),
            Box::new(m020260301_000002_wallet_tables::Migration),
            Box::new(m020260305_000001_kyc_tables::Migration),
            Box::new(m020260312_000001_catalog_tables::Migration),
            Box::new(m020260318_000001_affiliate_subscription_tables::Migration),
            Box::new(m020260322_000001_wallet_indexes::Migration),
        ]
    }
}
