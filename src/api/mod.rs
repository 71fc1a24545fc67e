//! HTTP API: JWT auth, middleware and handler services.

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
