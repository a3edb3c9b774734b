//! Edit Script Replay
//!
//! A script is JSON lines. Each line is either a structural edit
//! (`{"op":"set-topic","id":"root","topic":"Plan"}`) or a history step
//! (`{"op":"undo"}`, `{"op":"redo"}`, `{"op":"select","id":"n1"}`).
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::history::SharedHistory;
use crate::model::Edit;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Edit(Edit),
    Undo,
    Redo,
    Select(Option<String>),
}

/// Parse a whole script, reporting the 1-based line of the first bad step
pub fn parse_script(content: &str) -> Result<Vec<Step>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(n, line)| parse_step(line).with_context(|| format!("Invalid step on line {}", n + 1)))
        .collect()
}

pub fn parse_step(line: &str) -> Result<Step> {
    let value: Value = serde_json::from_str(line)?;
    let step = match value.get("op").and_then(Value::as_str) {
        Some("undo") => Step::Undo,
        Some("redo") => Step::Redo,
        Some("select") => Step::Select(value.get("id").and_then(Value::as_str).map(str::to_string)),
        _ => Step::Edit(serde_json::from_value(value)?),
    };
    Ok(step)
}

/// Counts reported after a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub undos: usize,
    pub redos: usize,
}

/// Run `steps` against `history`. Edits that fail to apply are logged and
/// counted but do not stop the replay; undo/redo at a boundary are no-ops.
pub async fn replay(history: &SharedHistory, steps: &[Step]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for step in steps {
        match step {
            Step::Edit(edit) => match history.try_update_document(|doc| edit.apply(doc)).await {
                Ok(true) => summary.applied += 1,
                Ok(false) => {
                    log::warn!("No map loaded; edit skipped");
                    summary.rejected += 1;
                }
                Err(e) => {
                    log::warn!("Edit on '{}' rejected: {:#}", edit.target().unwrap_or("map"), e);
                    summary.rejected += 1;
                }
            },
            Step::Undo => {
                if history.undo().await {
                    summary.undos += 1;
                }
            }
            Step::Redo => {
                if history.redo().await {
                    summary.redos += 1;
                }
            }
            Step::Select(id) => history.select(id.clone()).await,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    #[test]
    fn test_parse_script() {
        let script = r#"
# rename the root
{"op":"set-topic","id":"root","topic":"Plan"}
{"op":"undo"}

{"op":"select","id":"child1"}
{"op":"select"}
"#;
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[0], Step::Edit(Edit::SetTopic { .. })));
        assert_eq!(steps[1], Step::Undo);
        assert_eq!(steps[2], Step::Select(Some("child1".to_string())));
        assert_eq!(steps[3], Step::Select(None));
    }

    #[test]
    fn test_parse_error_names_the_line() {
        let err = parse_script("{\"op\":\"undo\"}\n{\"op\":\"explode\"}").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[tokio::test]
    async fn test_replay_counts() {
        let history = SharedHistory::default();
        history.set_document(Document::new_map("m1", "Replay")).await;

        let steps = parse_script(
            r#"{"op":"set-topic","id":"root","topic":"One"}
{"op":"remove","id":"missing"}
{"op":"undo"}
{"op":"undo"}
{"op":"redo"}"#,
        )
        .unwrap();
        let summary = replay(&history, &steps).await;

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 1,
                rejected: 1,
                undos: 1,
                redos: 1
            }
        );
        assert_eq!(history.document().await.unwrap().root.topic, "One");
    }
}
