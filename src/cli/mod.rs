//! Command-line entry point.

pub mod replay;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use crate::autosave::{Autosaver, FileStore};
use crate::config::{Args, Command, Config};
use crate::export::{self, ExportFormat};
use crate::folders::{build_folder_tree, Folder, MindMapSummary, TreeItem, TreeItemKind};
use crate::history::SharedHistory;
use crate::model::Document;

/// Parse arguments, set up logging and run the requested command
pub async fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(path) = &config.project_config_path {
        log::debug!("Using project config {}", path.display());
    }

    match args.command {
        Command::New { id, title, output } => {
            let doc = Document::new_map(id, &title);
            write_output(&doc.to_json_pretty()?, output.as_deref())
        }
        Command::Export {
            map,
            format,
            output,
        } => export_map(&map, format, output.as_deref()),
        Command::Tree {
            folders,
            maps,
            json,
        } => print_tree(&folders, maps.as_deref(), json),
        Command::Replay {
            map,
            script,
            output,
            autosave,
        } => replay_script(&config, &map, &script, output.as_deref(), autosave).await,
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file: {}", path.display()))?;
    Document::from_json(&content).with_context(|| format!("Invalid map file: {}", path.display()))
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse rows in {}", path.display()))
}

/// Print to stdout, or write to `output` when given
fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn export_map(map: &Path, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let doc = read_document(map)?;
    let rendered = export::export(&doc, format)?;
    log::debug!("Exported '{}' as {} ({} bytes)", doc.id, format.mime_type(), rendered.len());

    match output {
        Some(dir) if dir.is_dir() => {
            let target = dir.join(export::file_name(&doc, format));
            write_output(&rendered, Some(&target))
        }
        other => write_output(&rendered, other),
    }
}

fn print_tree(folders: &Path, maps: Option<&Path>, json: bool) -> Result<()> {
    let folders: Vec<Folder> = read_rows(folders)?;
    let maps: Vec<MindMapSummary> = match maps {
        Some(path) => read_rows(path)?,
        None => Vec::new(),
    };

    let tree = build_folder_tree(&folders, &maps);
    if json {
        return write_output(&serde_json::to_string_pretty(&tree)?, None);
    }

    let mut listing = String::new();
    render_listing(&tree, 0, &mut listing);
    print!("{}", listing);
    Ok(())
}

fn render_listing(items: &[TreeItem], depth: usize, out: &mut String) {
    for item in items {
        let marker = match item.kind {
            TreeItemKind::Folder => "+",
            TreeItemKind::MindMap => "-",
        };
        out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), marker, item.name));
        if let Some(children) = &item.children {
            render_listing(children, depth + 1, out);
        }
    }
}

async fn replay_script(
    config: &Config,
    map: &Path,
    script: &Path,
    output: Option<&Path>,
    autosave: bool,
) -> Result<()> {
    let doc = read_document(map)?;
    let content = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script: {}", script.display()))?;
    let steps = replay::parse_script(&content)?;

    let history = SharedHistory::new(config.history_manager());

    let saver = if autosave {
        let dir = config
            .autosave_dir
            .clone()
            .context("No autosave directory configured and no data directory available")?;
        log::info!("Autosaving to {}", dir.display());
        let saver = Autosaver::new(FileStore::new(dir), history.subscribe(), config.autosave_debounce);
        Some(tokio::spawn(saver.run()))
    } else {
        None
    };

    history.set_document(doc).await;
    let summary = replay::replay(&history, &steps).await;

    let (len, cursor, can_undo, can_redo) = history
        .inspect(|h| (h.len(), h.cursor(), h.can_undo(), h.can_redo()))
        .await;
    log::info!(
        "Replayed {} steps: {} applied, {} rejected, {} undos, {} redos",
        steps.len(),
        summary.applied,
        summary.rejected,
        summary.undos,
        summary.redos
    );
    eprintln!(
        "history: {} snapshots, cursor {}, can undo: {}, can redo: {}",
        len,
        cursor.map_or_else(|| "-".to_string(), |c| c.to_string()),
        can_undo,
        can_redo
    );

    let current = history
        .document()
        .await
        .context("No active document after replay")?;
    write_output(&current.to_json_pretty()?, output)?;

    // Dropping the last handle closes the channel; the saver flushes and exits
    drop(history);
    if let Some(task) = saver {
        let stats = task.await.context("Autosave task failed")?;
        if stats.failures > 0 {
            log::warn!("{} autosave attempts failed", stats.failures);
        }
    }

    Ok(())
}
