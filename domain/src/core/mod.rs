//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`] — a validated discussion topic
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — UTF-8 safe string helpers

pub mod error;
pub mod string;
pub mod topic;
