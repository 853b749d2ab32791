//! CLI command implementations.

pub mod common;
pub mod explode;
pub mod implode;
pub mod roundtrip;
pub mod validate;
