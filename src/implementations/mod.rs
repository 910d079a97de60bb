pub mod config;
pub mod gateway;

// Re-export implementations
pub use config::{ConfigError, GatewayConfig};
pub use gateway::{GatewayError, HttpKnowledgeGateway};
