//! Console front end: command-line parsing and status output.

pub mod app;
pub mod status;
