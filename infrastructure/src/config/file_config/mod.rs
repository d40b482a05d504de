//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and
//! application types once validated.

mod discussion;
mod providers;
mod roster;

pub use discussion::{FileDiscussionConfig, FileScheduleConfig};
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use roster::{FileBackendConfig, FilePersonaConfig, default_backends, default_personas};

use roundtable_application::DiscussionParams;
use roundtable_domain::{AgentRegistry, DomainError, Provider, ScheduleConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("at least one persona must be configured")]
    EmptyRoster,

    #[error("at least one backend must be configured")]
    EmptyPool,

    #[error("{section} entry #{index} has an empty id")]
    EmptyId { section: &'static str, index: usize },

    #[error("backend '{0}' has an empty model name")]
    EmptyModelName(String),

    #[error("backend '{backend}' uses unknown provider '{provider}'")]
    UnknownProvider { backend: String, provider: String },

    #[error("schedule.rounds cannot be 0")]
    ZeroRounds,

    #[error("discussion.step_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("discussion.summary_backend '{0}' is not a configured backend")]
    UnknownSummaryBackend(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Speaking roster, in speaking order
    pub personas: Vec<FilePersonaConfig>,
    /// Backend pool
    pub backends: Vec<FileBackendConfig>,
    pub schedule: FileScheduleConfig,
    pub discussion: FileDiscussionConfig,
    pub providers: FileProvidersConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            personas: default_personas(),
            backends: default_backends(),
            schedule: FileScheduleConfig::default(),
            discussion: FileDiscussionConfig::default(),
            providers: FileProvidersConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.personas.is_empty() {
            return Err(ConfigValidationError::EmptyRoster);
        }
        if self.backends.is_empty() {
            return Err(ConfigValidationError::EmptyPool);
        }

        if let Some(index) = self.personas.iter().position(|p| p.id.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyId {
                section: "personas",
                index,
            });
        }
        if let Some(index) = self.backends.iter().position(|b| b.id.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyId {
                section: "backends",
                index,
            });
        }

        for backend in &self.backends {
            if backend.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName(backend.id.clone()));
            }
            if backend.parse_provider().is_err() {
                return Err(ConfigValidationError::UnknownProvider {
                    backend: backend.id.clone(),
                    provider: backend.provider.clone(),
                });
            }
        }

        if self.schedule.rounds == 0 && self.schedule.total_turns.is_none() {
            return Err(ConfigValidationError::ZeroRounds);
        }
        if self.discussion.step_timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if let Some(id) = &self.discussion.summary_backend
            && !self.backends.iter().any(|b| &b.id == id)
        {
            return Err(ConfigValidationError::UnknownSummaryBackend(id.clone()));
        }

        Ok(())
    }

    /// Validate and build the roster and backend pool
    pub fn to_registry(&self) -> Result<AgentRegistry, ConfigValidationError> {
        self.validate()?;
        let personas = self.personas.iter().map(|p| p.to_persona()).collect();
        let bindings = self
            .backends
            .iter()
            .map(|b| b.to_binding())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AgentRegistry::new(personas, bindings)?)
    }

    pub fn to_schedule_config(&self) -> Result<ScheduleConfig, ConfigValidationError> {
        Ok(self.schedule.to_schedule_config(self.personas.len())?)
    }

    pub fn to_discussion_params(&self) -> DiscussionParams {
        self.discussion.to_params()
    }

    /// Providers referenced by at least one backend
    pub fn providers_in_use(&self) -> HashSet<Provider> {
        self.backends
            .iter()
            .filter_map(|b| b.parse_provider().ok())
            .collect()
    }
}
