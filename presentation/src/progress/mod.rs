//! Progress reporting while a discussion streams

pub mod reporter;
