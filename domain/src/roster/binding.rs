//! Backend binding entity

use super::provider::Provider;
use serde::{Deserialize, Serialize};

/// Identifier of a backend binding, unique within the pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingId(String);

impl BindingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BindingId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BindingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A generation backend that can be assigned to a persona (Entity)
///
/// `model` is the provider-specific model identifier sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendBinding {
    id: BindingId,
    provider: Provider,
    model: String,
    display_name: Option<String>,
}

impl BackendBinding {
    pub fn new(id: impl Into<BindingId>, provider: Provider, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider,
            model: model.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn id(&self) -> &BindingId {
        &self.id
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Human-readable label, falling back to the model identifier
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.model)
    }
}

impl std::fmt::Display for BackendBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.label(), self.provider, self.model)
    }
}
