//! Application-level utilities for the MarkNote CLI.
//!
//! This module provides:
//! - The per-invocation context (CLI args plus lazily loaded config)
//! - Config path resolution

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::{load_config, resolve_config_path};
