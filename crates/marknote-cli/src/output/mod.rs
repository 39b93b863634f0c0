//! Output formatting for notes and versions (JSON, table, plain text).

mod json;
mod text;

pub use json::{diff_json, note_json, notes_json, version_json, versions_json};
pub use text::{print_diff, print_note, print_note_list, print_version_list};
