//! Notes: the on-disk model, YAML frontmatter, and the note manager.

pub mod frontmatter;
pub mod manager;
pub mod types;

pub use frontmatter::{merge_metadata, parse_frontmatter, render_frontmatter};
pub use manager::{BatchOutcome, LinkReport, NoteManager, NotesSettings};
pub use types::{slugify, ArchiveInfo, EncryptionInfo, Metadata, Note, ENCRYPTION_FORMAT_VERSION};
