//! Document Export
//!
//! Text renderings of a mind map for download: JSON, OPML and Markdown.
//! Image formats are produced by the rendering widget and live elsewhere.

pub mod markdown;
pub mod opml;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use time::OffsetDateTime;

use crate::model::Document;

/// Supported text export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Opml,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Opml, ExportFormat::Markdown];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Opml => "opml",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Opml => "application/xml",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Opml => "opml",
            ExportFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "opml" | "xml" => Ok(ExportFormat::Opml),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => bail!("Unknown export format '{}' (expected json, opml or markdown)", other),
        }
    }
}

/// Render `doc` in `format`, using the current time for OPML head dates
pub fn export(doc: &Document, format: ExportFormat) -> Result<String> {
    export_at(doc, format, OffsetDateTime::now_utc())
}

/// Render `doc` in `format` with an explicit timestamp
pub fn export_at(doc: &Document, format: ExportFormat, generated_at: OffsetDateTime) -> Result<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(doc).context("Failed to serialize mind map"),
        ExportFormat::Opml => Ok(opml::render(doc, generated_at)),
        ExportFormat::Markdown => Ok(markdown::render(doc)),
    }
}

fn unsafe_filename_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("static pattern compiles"))
}

/// Download name: `<title>.<ext>`, `mindmap` when the title is blank
pub fn file_name(doc: &Document, format: ExportFormat) -> String {
    let title = doc.title.trim();
    let stem = if title.is_empty() {
        "mindmap".to_string()
    } else {
        unsafe_filename_chars().replace_all(title, "_").into_owned()
    };
    format!("{}.{}", stem, format.extension())
}
