//! CLI command implementations

pub mod config;
pub mod resolve;
pub mod run;

pub use config::execute as config;
pub use resolve::execute as resolve;
pub use run::execute as run;
