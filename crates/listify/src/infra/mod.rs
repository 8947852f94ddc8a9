//! Infrastructure adapters for the document host, clipboard, config, and logging.

pub mod clipboard;
pub mod config;
pub mod document;
pub mod logging;
