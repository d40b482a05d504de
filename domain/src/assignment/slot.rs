//! Slot assignment: the per-session persona → binding mapping

use crate::core::error::DomainError;
use crate::roster::binding::{BackendBinding, BindingId};
use crate::roster::persona::{Persona, PersonaId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One persona's slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub persona: PersonaId,
    pub binding: BindingId,
}

/// Per-session mapping from persona to backend binding (Value Object)
///
/// Holds exactly one entry per roster persona, in roster order. Immutable
/// once produced by [`SlotAssigner::assign`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    entries: Vec<SlotEntry>,
}

impl SlotAssignment {
    pub fn binding_for(&self, persona: &PersonaId) -> Option<&BindingId> {
        self.entries
            .iter()
            .find(|e| &e.persona == persona)
            .map(|e| &e.binding)
    }

    pub fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many personas each binding serves
    pub fn usage_counts(&self) -> HashMap<&BindingId, usize> {
        let mut counts = HashMap::new();
        for entry in &self.entries {
            *counts.entry(&entry.binding).or_insert(0) += 1;
        }
        counts
    }
}

/// Produces randomized slot assignments.
pub struct SlotAssigner;

impl SlotAssigner {
    /// Shuffle the pool with `rng`, then give `roster[i]` the binding at
    /// `shuffled[i mod pool_len]`.
    ///
    /// A pool smaller than the roster wraps around, so no binding serves more
    /// than `ceil(roster / pool)` personas. The same seeded rng always yields
    /// the same assignment.
    pub fn assign<R: Rng + ?Sized>(
        roster: &[Persona],
        pool: &[BackendBinding],
        rng: &mut R,
    ) -> Result<SlotAssignment, DomainError> {
        if roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        if pool.is_empty() {
            return Err(DomainError::EmptyPool);
        }

        let mut shuffled: Vec<&BindingId> = pool.iter().map(|b| b.id()).collect();
        shuffled.shuffle(rng);

        let entries = roster
            .iter()
            .enumerate()
            .map(|(i, persona)| SlotEntry {
                persona: persona.id().clone(),
                binding: shuffled[i % shuffled.len()].clone(),
            })
            .collect();

        Ok(SlotAssignment { entries })
    }
}
