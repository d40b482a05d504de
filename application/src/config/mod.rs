//! Application-level configuration.
//!
//! - [`DiscussionParams`] — pacing, step timeout, summary binding, rng seed

pub mod discussion_params;

pub use discussion_params::DiscussionParams;
