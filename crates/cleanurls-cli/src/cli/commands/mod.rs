//! CLI command handlers, one per file.

mod clean;
mod config;
mod unclean;

pub use clean::run_clean;
pub use config::run_config;
pub use unclean::run_unclean;
