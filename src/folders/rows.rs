//! Folder and mind-map rows as stored by the backend.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_expanded: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i64,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            parent_id: parent_id.map(str::to_string),
            created_by: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            color: String::new(),
            icon: String::new(),
            is_expanded: false,
            sort_order: 0,
        }
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Parent folder id; an empty string means top level
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }
}

/// The subset of a stored mind map the sidebar needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl MindMapSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>, folder_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            folder_id: folder_id.map(str::to_string),
            sort_order: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Containing folder id; an empty string means top level
    pub fn folder(&self) -> Option<&str> {
        self.folder_id.as_deref().filter(|f| !f.is_empty())
    }
}

/// Backend rows may carry `null` where the schema has a default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nulls_and_empty_parents() {
        let folder: Folder = serde_json::from_str(
            r#"{"id":"f1","name":"Work","parent_id":"","sort_order":null,"is_expanded":null}"#,
        )
        .unwrap();
        assert_eq!(folder.parent(), None);
        assert_eq!(folder.sort_order, 0);
        assert!(!folder.is_expanded);

        let map: MindMapSummary =
            serde_json::from_str(r#"{"id":"m1","title":"Plan","folder_id":"f1"}"#).unwrap();
        assert_eq!(map.folder(), Some("f1"));
    }
}
