//! UI primitives for the MarkNote CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and styles
//! - **Render**: Tables, headers, receipts, hints, diff lines
//! - **Format**: String utilities (truncate, dates)

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{
    badge, diff_line, header, hint, kv, print_error, receipt, simple_table, Column,
};

pub use format::{format_datetime, single_line, truncate};
