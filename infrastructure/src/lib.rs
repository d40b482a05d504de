//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading
//! and the streaming provider clients.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileDiscussionConfig,
    FilePersonaConfig, FileProviderConfig, FileProvidersConfig, FileScheduleConfig,
};
pub use providers::{
    AnthropicAdapter, OpenAiCompatibleAdapter, ProviderAdapter, ProviderSettings, RoutingGateway,
};
