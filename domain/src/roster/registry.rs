//! Agent registry: the static roster and backend pool

use super::binding::{BackendBinding, BindingId};
use super::persona::{Persona, PersonaId};
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Read-only roster of personas plus the pool of backend bindings.
///
/// Built once at process start and shared between sessions. Roster order is
/// significant: turn `n` belongs to `personas[n mod cycle_length]`.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    personas: Vec<Persona>,
    bindings: Vec<BackendBinding>,
}

impl AgentRegistry {
    /// Build a registry, rejecting empty inputs and duplicate ids
    pub fn new(personas: Vec<Persona>, bindings: Vec<BackendBinding>) -> Result<Self, DomainError> {
        if personas.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        if bindings.is_empty() {
            return Err(DomainError::EmptyPool);
        }

        let mut seen = HashSet::new();
        for persona in &personas {
            if !seen.insert(persona.id().as_str()) {
                return Err(DomainError::DuplicatePersona(persona.id().to_string()));
            }
        }

        let mut seen = HashSet::new();
        for binding in &bindings {
            if !seen.insert(binding.id().as_str()) {
                return Err(DomainError::DuplicateBinding(binding.id().to_string()));
            }
        }

        Ok(Self { personas, bindings })
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn bindings(&self) -> &[BackendBinding] {
        &self.bindings
    }

    pub fn persona(&self, id: &PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id() == id)
    }

    pub fn persona_at(&self, index: usize) -> Option<&Persona> {
        self.personas.get(index)
    }

    pub fn binding(&self, id: &BindingId) -> Option<&BackendBinding> {
        self.bindings.iter().find(|b| b.id() == id)
    }

    pub fn roster_len(&self) -> usize {
        self.personas.len()
    }

    pub fn pool_len(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::provider::Provider;

    fn personas() -> Vec<Persona> {
        vec![
            Persona::new("optimist", "Sunny", "Always look on the bright side."),
            Persona::new("pessimist", "Gloomy", "Everything will go wrong."),
        ]
    }

    fn bindings() -> Vec<BackendBinding> {
        vec![BackendBinding::new("gpt", Provider::OpenAi, "gpt-4o")]
    }

    #[test]
    fn test_lookup() {
        let registry = AgentRegistry::new(personas(), bindings()).unwrap();
        assert_eq!(registry.roster_len(), 2);
        assert_eq!(registry.pool_len(), 1);
        assert_eq!(
            registry.persona(&PersonaId::new("pessimist")).unwrap().name(),
            "Gloomy"
        );
        assert_eq!(registry.persona_at(0).unwrap().name(), "Sunny");
        assert!(registry.persona_at(2).is_none());
        assert_eq!(
            registry.binding(&BindingId::new("gpt")).unwrap().model(),
            "gpt-4o"
        );
        assert!(registry.binding(&BindingId::new("claude")).is_none());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert_eq!(
            AgentRegistry::new(vec![], bindings()).unwrap_err(),
            DomainError::EmptyRoster
        );
        assert_eq!(
            AgentRegistry::new(personas(), vec![]).unwrap_err(),
            DomainError::EmptyPool
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut dup = personas();
        dup.push(Persona::new("optimist", "Sunny II", "..."));
        assert_eq!(
            AgentRegistry::new(dup, bindings()).unwrap_err(),
            DomainError::DuplicatePersona("optimist".to_string())
        );

        let mut dup = bindings();
        dup.push(BackendBinding::new("gpt", Provider::Anthropic, "claude"));
        assert_eq!(
            AgentRegistry::new(personas(), dup).unwrap_err(),
            DomainError::DuplicateBinding("gpt".to_string())
        );
    }
}
