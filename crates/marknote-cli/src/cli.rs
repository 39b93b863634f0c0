use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use marknote_core::VERSION;

/// MarkNote - Markdown notes with per-note encryption and version history
#[derive(Parser)]
#[command(name = "marknote")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Notes directory (overrides config)
    #[arg(short = 'd', long, global = true, env = "MARKNOTE_DIR", value_name = "DIR")]
    pub notes_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Directory where notes are stored
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Directory for version history
    #[arg(long, value_name = "DIR")]
    pub versions_dir: Option<PathBuf>,

    /// Author recorded on versions
    #[arg(long)]
    pub author: Option<String>,

    /// Default editor
    #[arg(long)]
    pub editor: Option<String>,

    /// Disable version history
    #[arg(long)]
    pub no_versions: bool,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `new` command
#[derive(Args)]
pub struct NewArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Note body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Add tags to the note (repeat or comma-separate)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Category (subdirectory) for the note
    #[arg(short, long)]
    pub category: Option<String>,

    /// Disable interactive prompts (body defaults to a heading)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Category of the note
    #[arg(short, long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Read the password for an encrypted note from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Filter by category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only notes updated within a window (e.g., "7d", "24h")
    #[arg(long)]
    pub last: Option<String>,

    /// Include archived notes
    #[arg(long, conflicts_with = "archived")]
    pub all: bool,

    /// Only archived notes
    #[arg(long)]
    pub archived: bool,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Category of the note
    #[arg(short, long)]
    pub category: Option<String>,

    /// New body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Replace tags (repeat or comma-separate)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Message recorded with the new version
    #[arg(short, long)]
    pub message: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// A single note, addressed by title and optional category
#[derive(Args)]
pub struct NoteArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Category of the note
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Arguments for the `archive` command
#[derive(Args)]
pub struct ArchiveArgs {
    /// Note titles
    #[arg(value_name = "TITLE", required = true)]
    pub titles: Vec<String>,

    /// Category of the notes
    #[arg(short, long)]
    pub category: Option<String>,

    /// Reason for archiving
    #[arg(short, long)]
    pub reason: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `bulk-delete` command group
#[derive(Args)]
pub struct BulkDeleteArgs {
    #[command(subcommand)]
    pub command: BulkDeleteSubcommand,
}

#[derive(Subcommand)]
pub enum BulkDeleteSubcommand {
    /// Delete notes by title
    Titles(BulkDeleteTitlesArgs),

    /// Delete every note carrying the given tags
    Tags(BulkDeleteTagsArgs),
}

#[derive(Args)]
pub struct BulkDeleteTitlesArgs {
    /// Note titles
    #[arg(value_name = "TITLE", required = true)]
    pub titles: Vec<String>,

    /// Category of the notes
    #[arg(short, long)]
    pub category: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct BulkDeleteTagsArgs {
    /// Tags to match
    #[arg(value_name = "TAG", required = true)]
    pub tags: Vec<String>,

    /// Only notes in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Require every tag instead of any
    #[arg(short = 'a', long)]
    pub all_tags: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in titles, tags and bodies
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Include archived notes
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `link` command group
#[derive(Args)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkSubcommand,
}

#[derive(Subcommand)]
pub enum LinkSubcommand {
    /// Link one note to another
    Add(LinkChangeArgs),

    /// Remove a link between notes
    Remove(LinkChangeArgs),

    /// Show the notes a note links to
    List(LinkListArgs),
}

#[derive(Args)]
pub struct LinkChangeArgs {
    /// Note the link starts from
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Note the link points to
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Also link (or unlink) TARGET back to SOURCE
    #[arg(short, long)]
    pub bidirectional: bool,

    /// Category of the source note
    #[arg(short, long)]
    pub category: Option<String>,

    /// Category of the target note
    #[arg(long)]
    pub target_category: Option<String>,
}

#[derive(Args)]
pub struct LinkListArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Show notes linking to this one instead
    #[arg(long)]
    pub backlinks: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `tags` and `categories` commands
#[derive(Args)]
pub struct StatsArgs {
    /// Include archived notes
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `count` command
#[derive(Args)]
pub struct CountArgs {
    /// Only notes with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only notes in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Include archived notes
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `wordcount` command
#[derive(Args)]
pub struct WordcountArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Read the password for an encrypted note from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

/// Arguments for `encrypt` and `decrypt`
#[derive(Args)]
pub struct CryptArgs {
    /// Note titles
    #[arg(value_name = "TITLE", required = true)]
    pub titles: Vec<String>,

    /// Category of the notes
    #[arg(short, long)]
    pub category: Option<String>,

    /// Disable interactive prompts (password must come from the environment)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `passwd` command
#[derive(Args)]
pub struct PasswdArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Disable interactive prompts (passwords must come from the environment)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Note title (omit to report every note)
    #[arg(value_name = "TITLE")]
    pub title: Option<String>,

    /// Category of the note(s)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `versions` command group
#[derive(Args)]
pub struct VersionsArgs {
    #[command(subcommand)]
    pub command: VersionsSubcommand,
}

#[derive(Subcommand)]
pub enum VersionsSubcommand {
    /// List the version history of a note
    List(VersionListArgs),

    /// Print the content of one version
    Show(VersionShowArgs),

    /// Line diff between two versions
    Diff(VersionDiffArgs),

    /// Restore a note to an earlier version
    Restore(VersionRestoreArgs),

    /// Snapshot the current note as a new version
    Create(VersionCreateArgs),

    /// Delete a note's entire version history
    Purge(VersionPurgeArgs),
}

#[derive(Args)]
pub struct VersionListArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VersionShowArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Version id
    #[arg(value_name = "VERSION")]
    pub version_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VersionDiffArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Older version id
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Newer version id (defaults to the latest)
    #[arg(value_name = "TO")]
    pub to: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VersionRestoreArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Version id to restore
    #[arg(value_name = "VERSION")]
    pub version_id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct VersionCreateArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Message describing this version
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct VersionPurgeArgs {
    #[command(flatten)]
    pub note: NoteArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the notes directory
    Init(InitArgs),

    /// Create a new note
    New(NewArgs),

    /// Show a note (decrypting it for display if needed)
    Show(ShowArgs),

    /// List notes, most recently updated first
    List(ListArgs),

    /// Replace a note's body or tags (records a version)
    Edit(EditArgs),

    /// Delete a note and its version history
    Delete(DeleteArgs),

    /// Delete several notes at once
    BulkDelete(BulkDeleteArgs),

    /// Search titles, tags and bodies
    Search(SearchArgs),

    /// Mark notes as archived
    Archive(ArchiveArgs),

    /// Clear a note's archived flag
    Unarchive(NoteArgs),

    /// Manage links between notes
    Link(LinkArgs),

    /// Tag usage across notes
    Tags(StatsArgs),

    /// Note count per category
    Categories(StatsArgs),

    /// Count notes
    Count(CountArgs),

    /// Count the words in a note body
    Wordcount(WordcountArgs),

    /// Encrypt one or more notes with a password
    Encrypt(CryptArgs),

    /// Permanently decrypt one or more notes
    Decrypt(CryptArgs),

    /// Change the password of an encrypted note
    Passwd(PasswdArgs),

    /// Report whether notes are encrypted
    Status(StatusArgs),

    /// Inspect and manage version history
    Versions(VersionsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_versions_diff_defaults_to_latest() {
        let cli = Cli::try_parse_from(["marknote", "versions", "diff", "Plan", "v000001_x"]).unwrap();
        match cli.command {
            Some(Commands::Versions(VersionsArgs {
                command: VersionsSubcommand::Diff(args),
            })) => {
                assert_eq!(args.note.title, "Plan");
                assert_eq!(args.from, "v000001_x");
                assert!(args.to.is_none());
            }
            _ => panic!("expected versions diff"),
        }
    }

    #[test]
    fn test_parse_bulk_delete_tags() {
        let cli =
            Cli::try_parse_from(["marknote", "bulk-delete", "tags", "old", "tmp", "-a", "-y"])
                .unwrap();
        match cli.command {
            Some(Commands::BulkDelete(BulkDeleteArgs {
                command: BulkDeleteSubcommand::Tags(args),
            })) => {
                assert_eq!(args.tags, vec!["old", "tmp"]);
                assert!(args.all_tags);
                assert!(args.yes);
            }
            _ => panic!("expected bulk-delete tags"),
        }
    }

    #[test]
    fn test_parse_link_add() {
        let cli = Cli::try_parse_from([
            "marknote", "link", "add", "Hub", "Spoke", "-b", "--target-category", "refs",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Link(LinkArgs {
                command: LinkSubcommand::Add(args),
            })) => {
                assert_eq!(args.source, "Hub");
                assert_eq!(args.target, "Spoke");
                assert!(args.bidirectional);
                assert_eq!(args.target_category.as_deref(), Some("refs"));
            }
            _ => panic!("expected link add"),
        }
    }

    #[test]
    fn test_list_all_conflicts_with_archived() {
        assert!(Cli::try_parse_from(["marknote", "list", "--all", "--archived"]).is_err());
    }

    #[test]
    fn test_encrypt_requires_title() {
        assert!(Cli::try_parse_from(["marknote", "encrypt"]).is_err());
        let cli = Cli::try_parse_from(["marknote", "encrypt", "A", "B", "-c", "work"]).unwrap();
        match cli.command {
            Some(Commands::Encrypt(args)) => {
                assert_eq!(args.titles, vec!["A", "B"]);
                assert_eq!(args.category.as_deref(), Some("work"));
            }
            _ => panic!("expected encrypt"),
        }
    }
}
