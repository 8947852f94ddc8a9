//! Application layer orchestrating domain logic and infrastructure.

pub mod convert;
pub mod host;
pub mod render;
