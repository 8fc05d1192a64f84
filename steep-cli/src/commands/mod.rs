//! CLI command implementations

pub mod config;
pub mod load;
pub mod report;

pub use config::handle_config;
pub use load::{handle_probe, handle_swarm};
pub use report::handle_report;
