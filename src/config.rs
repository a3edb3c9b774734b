//! Configuration management for the mind map tools.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration (`.mindmap.toml`)
//! - Defaults for history size and autosave

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::autosave::DEFAULT_DEBOUNCE;
use crate::export::ExportFormat;
use crate::history::{HistoryManager, OverflowPolicy, DEFAULT_HISTORY_LIMIT};

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".mindmap.toml";

/// Command-line arguments for the mind map tools
#[derive(Debug, Parser)]
#[command(name = "mindmap")]
#[command(about = "Edit history, export and folder tools for mind maps")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Project configuration file
    #[arg(long, global = true, help = "Path to a .mindmap.toml file")]
    pub config: Option<PathBuf>,

    /// Number of undo snapshots kept per map
    #[arg(long, global = true, help = "Maximum number of history snapshots")]
    pub history_limit: Option<usize>,

    /// Where autosaved maps are written
    #[arg(long, global = true, help = "Directory for autosaved maps")]
    pub autosave_dir: Option<PathBuf>,

    /// Quiet period before an autosave
    #[arg(long, global = true, help = "Autosave debounce in milliseconds")]
    pub debounce_ms: Option<u64>,

    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the starter map for a new id
    New {
        id: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Render a map as JSON, OPML or Markdown
    Export {
        map: PathBuf,
        #[arg(long, short, default_value = "json")]
        format: ExportFormat,
        /// File or directory; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the folder tree built from folder and map rows
    Tree {
        folders: PathBuf,
        #[arg(long)]
        maps: Option<PathBuf>,
        /// Emit the tree as JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },
    /// Apply a JSON-lines edit script through the undo history
    Replay {
        map: PathBuf,
        script: PathBuf,
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Autosave the map while the script runs
        #[arg(long)]
        autosave: bool,
    },
}

/// `[history]` table of the project file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySection {
    pub limit: Option<usize>,
    pub overflow: Option<OverflowPolicy>,
}

/// `[autosave]` table of the project file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveSection {
    pub debounce_ms: Option<u64>,
    pub dir: Option<PathBuf>,
}

/// Contents of `.mindmap.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub history: HistorySection,
    pub autosave: AutosaveSection,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub history_limit: usize,
    pub overflow: OverflowPolicy,
    pub autosave_debounce: Duration,
    pub autosave_dir: Option<PathBuf>,
    pub log_level: String,
    /// Project file the settings were read from, if any
    pub project_config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            overflow: OverflowPolicy::default(),
            autosave_debounce: DEFAULT_DEBOUNCE,
            autosave_dir: Self::default_autosave_dir(),
            log_level: "info".to_string(),
            project_config_path: None,
        }
    }
}

impl Config {
    /// Build configuration from arguments, looking for a project file in the
    /// current directory
    pub fn from_args(args: &Args) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        Self::from_args_in(args, &cwd)
    }

    /// Build configuration from arguments with `dir` as the project root
    /// (useful for testing)
    pub fn from_args_in(args: &Args, dir: &Path) -> Result<Self> {
        let project_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => Some(dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        let project = match &project_path {
            Some(path) => {
                log::debug!("Loading project config: {}", path.display());
                ProjectConfig::load(path)?
            }
            None => ProjectConfig::default(),
        };

        let defaults = Config::default();

        // CLI > project file > defaults
        Ok(Config {
            history_limit: args
                .history_limit
                .or(project.history.limit)
                .unwrap_or(defaults.history_limit),
            overflow: project.history.overflow.unwrap_or(defaults.overflow),
            autosave_debounce: args
                .debounce_ms
                .or(project.autosave.debounce_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.autosave_debounce),
            autosave_dir: args
                .autosave_dir
                .clone()
                .or(project.autosave.dir)
                .or(defaults.autosave_dir),
            log_level: args.log_level.clone(),
            project_config_path: project_path,
        })
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    /// A fresh history manager honouring the configured limits
    pub fn history_manager(&self) -> HistoryManager {
        HistoryManager::with_limit(self.history_limit, self.overflow)
    }

    /// `<data dir>/mindmap/maps`
    pub fn default_autosave_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("mindmap").join("maps"))
    }
}
