//! Core domain types and the selection parser.

pub mod errors;
pub mod model;
pub mod parser;
