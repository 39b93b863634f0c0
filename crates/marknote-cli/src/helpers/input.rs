//! Input handling for passwords, confirmations and note bodies.

use std::io::{self, BufRead, IsTerminal, Read};
use std::path::Path;
use std::process::Command;

use dialoguer::{Confirm, Password};
use marknote_core::crypto::validate_password;

use crate::constants::env;

/// Prompt for a note password, or read it from MARKNOTE_PASSWORD.
pub fn prompt_password(prompt: &str, interactive: bool) -> anyhow::Result<String> {
    if let Some(value) = env_password(env::PASSWORD) {
        return Ok(value);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ));
    }
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a password that will protect a note, with confirmation.
///
/// `env_var` lets `passwd` take its new password from MARKNOTE_NEW_PASSWORD
/// while `encrypt` uses MARKNOTE_PASSWORD.
pub fn prompt_new_password(env_var: &str, interactive: bool) -> anyhow::Result<String> {
    if let Some(value) = env_password(env_var) {
        validate_password(&value)
            .map_err(|e| anyhow::anyhow!("Password does not meet requirements: {}", e))?;
        return Ok(value);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            env_var
        ));
    }
    loop {
        let password = Password::new()
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
        if let Err(err) = validate_password(&password) {
            eprintln!("Password does not meet requirements: {}", err);
            continue;
        }
        return Ok(password);
    }
}

/// Read a password from the first line of stdin.
pub fn read_password_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow::anyhow!("No password provided on stdin"));
    }
    Ok(password)
}

/// Ask a yes/no question. Non-interactive sessions must pass `--yes`.
pub fn confirm(prompt: &str, interactive: bool) -> anyhow::Result<bool> {
    if !interactive {
        return Err(anyhow::anyhow!(
            "Confirmation required and no TTY available. Pass --yes."
        ));
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

fn env_password(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Read a note body from `--body`, stdin, or $EDITOR.
///
/// Returns `None` when `no_input` is set and nothing was supplied, so the
/// caller can fall back to its default body.
pub fn read_note_body(
    no_input: bool,
    body: Option<String>,
    editor_override: Option<&str>,
    initial_body: Option<&str>,
) -> anyhow::Result<Option<String>> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("--body cannot be empty"));
        }
        return Ok(Some(value));
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed));
        }
        if no_input || editor_override.is_none() {
            return Ok(None);
        }
        return read_body_from_editor(editor_override, initial_body).map(Some);
    }

    if no_input {
        return Ok(None);
    }

    read_body_from_editor(editor_override, initial_body).map(Some)
}

/// Open $EDITOR on a temp file seeded with `initial_body`.
fn read_body_from_editor(
    editor_override: Option<&str>,
    initial_body: Option<&str>,
) -> anyhow::Result<String> {
    let editor = editor_override
        .map(|value| value.to_string())
        .or_else(|| std::env::var("EDITOR").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("$EDITOR is not set; use --body or pipe content via stdin")
        })?;

    let file = tempfile::Builder::new()
        .prefix("marknote_")
        .suffix(".md")
        .tempfile()
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;
    std::fs::write(file.path(), initial_body.unwrap_or(""))
        .map_err(|e| anyhow::anyhow!("Failed to write temp file: {}", e))?;

    let status = editor_command(&editor, file.path())
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(file.path())
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    let trimmed = contents.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("Note body is empty"));
    }

    Ok(trimmed)
}

/// Command that opens `path` in `editor`.
///
/// The editor string may carry arguments (`code -w`), so on Unix it runs
/// through `sh` with the file passed as a positional parameter.
fn editor_command(editor: &str, path: &Path) -> Command {
    if cfg!(windows) {
        let mut parts = editor.split_whitespace();
        let mut cmd = Command::new(parts.next().unwrap_or(editor));
        cmd.args(parts).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(format!("{} \"$@\"", editor))
            .arg(editor)
            .arg(path);
        cmd
    }
}
