//! Storage layer: SeaORM backend and domain value types.

pub mod backend;
pub mod models;

pub use backend::{ListingQuery, SeaOrmStorage, TransactionFilter};
pub use models::*;
