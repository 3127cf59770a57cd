pub mod server;
pub mod session;

pub use server::ServerConfig;
pub use session::{validate_production_config, SessionConfig, SessionLayer};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("{0}")]
    Insecure(String),
}

pub(crate) fn current_environment() -> String {
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub(crate) fn is_production() -> bool {
    current_environment() == "production"
}
