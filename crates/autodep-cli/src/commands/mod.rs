//! Command implementations for autodep-cli

pub mod acquire;
pub mod info;
pub mod install;
pub mod status;

pub use acquire::{run_acquire, run_expire};
pub use info::run_info;
pub use install::run_install;
pub use status::run_status;
