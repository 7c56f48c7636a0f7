//! Configuration and profile types

mod config;
mod user;

pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use user::UserInfo;
