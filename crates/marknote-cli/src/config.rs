use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use marknote_core::{Metadata, NotesSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkNoteConfig {
    pub notes: NotesSection,
    #[serde(default)]
    pub versions: VersionsSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesSection {
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub dir: Option<String>,
    pub author: Option<String>,
}

impl Default for VersionsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            author: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsSection {
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub frontmatter: toml::Table,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiSection {
    pub editor: Option<String>,
}

fn default_true() -> bool {
    true
}

impl MarkNoteConfig {
    pub fn new(
        notes_dir: PathBuf,
        versions_dir: Option<PathBuf>,
        versioning: bool,
        author: Option<String>,
        editor: Option<String>,
    ) -> Self {
        Self {
            notes: NotesSection {
                dir: notes_dir.to_string_lossy().to_string(),
            },
            versions: VersionsSection {
                enabled: versioning,
                dir: versions_dir.map(|path| path.to_string_lossy().to_string()),
                author,
            },
            defaults: DefaultsSection::default(),
            ui: UiSection { editor },
        }
    }

    /// Built-in configuration used when no config file exists.
    pub fn builtin() -> anyhow::Result<Self> {
        Ok(Self::new(default_notes_dir()?, None, true, None, None))
    }

    /// Where version history lives: the configured dir, or the XDG data dir.
    pub fn versions_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.versions.dir {
            Some(dir) => Ok(expand_home(dir)),
            None => default_versions_dir(),
        }
    }

    /// Note manager settings, with `notes_dir` taking precedence over `[notes] dir`.
    pub fn to_settings(&self, notes_dir: Option<&Path>) -> anyhow::Result<NotesSettings> {
        let dir = notes_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| expand_home(&self.notes.dir));

        let mut settings = NotesSettings::new(dir);
        settings.default_tags = self.defaults.tags.clone();
        settings.default_category = self.defaults.category.clone();
        settings.default_frontmatter = frontmatter_defaults(&self.defaults.frontmatter)?;
        settings.versioning_enabled = self.versions.enabled;
        settings.author = self.versions.author.clone();
        Ok(settings)
    }
}

fn frontmatter_defaults(table: &toml::Table) -> anyhow::Result<Metadata> {
    match serde_json::to_value(table)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(Metadata::new()),
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_notes_dir() -> anyhow::Result<PathBuf> {
    Ok(home_dir()?.join("marknote"))
}

pub fn default_versions_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("versions"))
}

pub fn read_config(path: &Path) -> anyhow::Result<MarkNoteConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &MarkNoteConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("marknote"));
        }
    }
    Ok(home_dir()?.join(".config").join("marknote"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("marknote"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("marknote"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

/// Expand a leading `~/` against `$HOME`.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Ok(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
