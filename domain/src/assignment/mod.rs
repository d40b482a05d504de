//! Slot assignment of personas to backend bindings.

pub mod slot;
