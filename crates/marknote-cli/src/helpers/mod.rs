//! Helper functions for the CLI.

mod input;
mod parsing;

pub use input::{
    confirm, prompt_new_password, prompt_password, read_note_body, read_password_stdin,
};
pub use parsing::{parse_duration, parse_tags};
