//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells and clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Note, version, or history not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, or the operation conflicts with the note's state.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong password (or tampered ciphertext).
    pub const AUTH_FAILED: i32 = 5;

    /// Encrypted note is corrupted or not in MarkNote format.
    pub const CORRUPTED: i32 = 6;

    /// Filesystem or cipher failure unrelated to user input.
    pub const OPERATION_FAILED: i32 = 7;
}

/// Environment variables read by the CLI.
pub mod env {
    /// Override the config file path.
    pub const CONFIG: &str = "MARKNOTE_CONFIG";

    /// Password for encrypt / decrypt / show, and the current password for `passwd`.
    pub const PASSWORD: &str = "MARKNOTE_PASSWORD";

    /// New password for `passwd`.
    pub const NEW_PASSWORD: &str = "MARKNOTE_NEW_PASSWORD";

    /// Log filter (tracing-subscriber `EnvFilter` syntax).
    pub const LOG: &str = "MARKNOTE_LOG";
}
