pub mod config;
pub mod logging;

pub mod checksum;
pub mod classify;
pub mod gate;
pub mod name;
pub mod request;
pub mod store;
pub mod variant;
