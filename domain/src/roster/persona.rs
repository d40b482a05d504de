//! Persona entity

use serde::{Deserialize, Serialize};

/// Identifier of a persona, unique within a roster
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaId(String);

impl PersonaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonaId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PersonaId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A configured discussion participant (Entity)
///
/// Immutable once built; the instruction is sent as the system prompt for
/// every turn this persona speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    id: PersonaId,
    name: String,
    tagline: Option<String>,
    instruction: String,
}

impl Persona {
    pub fn new(
        id: impl Into<PersonaId>,
        name: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tagline: None,
            instruction: instruction.into(),
        }
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    pub fn id(&self) -> &PersonaId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}
