//! Roster domain: who can speak and which backends can speak for them.
//!
//! - [`persona::Persona`] — a discussion participant with a fixed instruction
//! - [`binding::BackendBinding`] — a provider + model pair
//! - [`registry::AgentRegistry`] — the static roster and binding pool

pub mod binding;
pub mod persona;
pub mod provider;
pub mod registry;
