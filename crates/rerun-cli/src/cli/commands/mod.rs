//! CLI command handlers. Each command is in its own file.

mod config;
mod exec;

pub use config::run_show_config;
pub use exec::run_exec;
