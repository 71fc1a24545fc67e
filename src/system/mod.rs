//! Platform and process-level utilities.

pub mod logging;
