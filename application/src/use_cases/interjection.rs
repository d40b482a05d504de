//! Non-speaker steps: the interim summary and the closing moderator.
//!
//! Both are one-off generation calls on a binding chosen outside the slot
//! assignment. Their text is committed with a role that makes the record
//! distinguishable from speaker turns.

use rand::Rng;
use rand::seq::SliceRandom;
use roundtable_domain::{
    AgentRegistry, BackendBinding, BindingId, DomainError, RecordRole, StepKind, TurnMetadata,
};

/// A scheduled step that is not a persona's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interjection {
    /// Interim summary inserted before `before_turn`
    MidSummary { before_turn: usize },
    /// Closing synthesis after the last turn
    Moderator,
}

impl Interjection {
    pub fn kind(&self) -> StepKind {
        match self {
            Interjection::MidSummary { .. } => StepKind::MidSummary,
            Interjection::Moderator => StepKind::Moderator,
        }
    }

    pub fn metadata(&self, total_turns: usize) -> TurnMetadata<'static> {
        match *self {
            Interjection::MidSummary { before_turn } => TurnMetadata::MidSummary {
                before_turn,
                total_turns,
            },
            Interjection::Moderator => TurnMetadata::Moderator { total_turns },
        }
    }

    pub fn record_role(&self, binding: BindingId) -> RecordRole {
        match self {
            Interjection::MidSummary { .. } => RecordRole::Summary { binding },
            Interjection::Moderator => RecordRole::Moderator { binding },
        }
    }

    /// Pick the binding that produces this step.
    ///
    /// The summary uses `preferred` when given; otherwise both steps draw a
    /// uniformly random binding from the pool.
    pub fn select_binding<'a, R: Rng + ?Sized>(
        &self,
        registry: &'a AgentRegistry,
        preferred: Option<&BindingId>,
        rng: &mut R,
    ) -> Result<&'a BackendBinding, DomainError> {
        if let (Interjection::MidSummary { .. }, Some(id)) = (self, preferred) {
            return registry
                .binding(id)
                .ok_or_else(|| DomainError::MissingBinding(id.to_string()));
        }
        registry
            .bindings()
            .choose(rng)
            .ok_or(DomainError::EmptyPool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use roundtable_domain::{Persona, Provider};

    fn registry() -> AgentRegistry {
        AgentRegistry::new(
            vec![Persona::new("optimist", "Sunny", "be upbeat")],
            vec![
                BackendBinding::new("gpt", Provider::OpenAi, "gpt-4o"),
                BackendBinding::new("claude", Provider::Anthropic, "claude-sonnet"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_summary_prefers_configured_binding() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(1);
        let preferred = BindingId::new("claude");

        for _ in 0..10 {
            let binding = Interjection::MidSummary { before_turn: 3 }
                .select_binding(&registry, Some(&preferred), &mut rng)
                .unwrap();
            assert_eq!(binding.id().as_str(), "claude");
        }
    }

    #[test]
    fn test_unknown_preferred_binding_is_rejected() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(1);
        let err = Interjection::MidSummary { before_turn: 3 }
            .select_binding(&registry, Some(&BindingId::new("llama")), &mut rng)
            .unwrap_err();
        assert_eq!(err, DomainError::MissingBinding("llama".to_string()));
    }

    #[test]
    fn test_moderator_ignores_preference_and_draws_from_pool() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(42);
        let preferred = BindingId::new("claude");

        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let binding = Interjection::Moderator
                .select_binding(&registry, Some(&preferred), &mut rng)
                .unwrap();
            seen.insert(binding.id().as_str().to_string());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_record_roles() {
        let id = BindingId::new("gpt");
        assert!(matches!(
            Interjection::MidSummary { before_turn: 6 }.record_role(id.clone()),
            RecordRole::Summary { .. }
        ));
        assert!(matches!(
            Interjection::Moderator.record_role(id),
            RecordRole::Moderator { .. }
        ));
    }
}
