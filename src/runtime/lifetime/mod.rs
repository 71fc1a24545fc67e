mod shutdown;
mod startup;

pub use shutdown::shutdown_cleanup;
pub use startup::{StartupContext, prepare_server_startup};
