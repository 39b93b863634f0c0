use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_notes_dir, write_config, MarkNoteConfig};
use crate::ui::{hint, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            config_path.display()
        ));
    }

    let notes_dir = match args.dir.clone().or_else(|| ctx.cli().notes_dir.clone()) {
        Some(dir) => dir,
        None => default_notes_dir()?,
    };
    let config = MarkNoteConfig::new(
        notes_dir.clone(),
        args.versions_dir.clone(),
        !args.no_versions,
        args.author.clone(),
        args.editor.clone(),
    );

    std::fs::create_dir_all(&notes_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create notes directory {}: {}",
            notes_dir.display(),
            e
        )
    })?;
    write_config(&config_path, &config)?;
    tracing::info!(config = %config_path.display(), "wrote config");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let notes = notes_dir.display().to_string();
        let cfg = config_path.display().to_string();
        let versions = config.versions_dir()?.display().to_string();
        let mut items = vec![("Notes", notes.as_str()), ("Config", cfg.as_str())];
        if config.versions.enabled {
            items.push(("Versions", versions.as_str()));
        }
        println!("{}", receipt(&ui_ctx, "Initialized", &items));
        if ui_ctx.mode.is_pretty() {
            println!("{}", hint(&ui_ctx, "marknote new \"My first note\""));
        }
    }
    Ok(())
}
