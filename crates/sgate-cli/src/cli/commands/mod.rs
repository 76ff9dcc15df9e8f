//! CLI command handlers, one per file.

mod check;
mod checksum;
mod serve;

pub use check::{run_check, CheckArgs};
pub use checksum::run_checksum;
pub use serve::run_serve;
