//! Domain services shared between HTTP handlers and tests.

pub mod accounts;
pub mod catalog;
pub mod kyc;
pub mod ledger;
pub mod monnify;
pub mod subscriptions;

pub use accounts::{AccountService, RegisterRequest};
pub use catalog::CatalogService;
pub use kyc::{KycService, ReviewOutcome};
pub use ledger::{FeeSchedule, LedgerService, PurchaseOutcome, PurchaseRequest};
pub use monnify::{BankingProvider, MonnifyClient, ReservedAccountRequest};
pub use subscriptions::SubscriptionService;
