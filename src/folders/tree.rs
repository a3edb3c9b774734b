//! Folder Tree Assembly
//!
//! Turns the flat folder and mind-map rows into nested structures. Both
//! builders index every folder first, then attach children to parents, so
//! rows may arrive in any order.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use serde::Serialize;

use super::rows::{Folder, MindMapSummary};

/// A folder with its sub-folders and the maps filed directly in it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    #[serde(flatten)]
    pub folder: Folder,
    pub children: Vec<FolderNode>,
    pub mind_maps: Vec<MindMapSummary>,
}

/// Result of [`build_hierarchy`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    pub root_folders: Vec<FolderNode>,
    pub all_folders: Vec<Folder>,
    pub all_mind_maps: Vec<MindMapSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeItemKind {
    Folder,
    #[serde(rename = "mindmap")]
    MindMap,
}

/// Sidebar entry: either a folder or a map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TreeItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
    pub sort_order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Row indices grouped by parent, in input order
struct Index<'a> {
    roots: Vec<usize>,
    children: HashMap<&'a str, Vec<usize>>,
    maps: HashMap<&'a str, Vec<usize>>,
    loose_maps: Vec<usize>,
}

impl<'a> Index<'a> {
    fn build(folders: &'a [Folder], maps: &'a [MindMapSummary]) -> Self {
        let known: HashSet<&str> = folders.iter().map(|f| f.id.as_str()).collect();

        let mut roots = Vec::new();
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, folder) in folders.iter().enumerate() {
            match folder.parent() {
                None => roots.push(i),
                Some(parent) if known.contains(parent) => children.entry(parent).or_default().push(i),
                Some(parent) => {
                    log::debug!("folder '{}' has unknown parent '{}'", folder.id, parent)
                }
            }
        }

        let mut by_folder: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut loose_maps = Vec::new();
        for (i, map) in maps.iter().enumerate() {
            match map.folder() {
                None => loose_maps.push(i),
                Some(folder) if known.contains(folder) => by_folder.entry(folder).or_default().push(i),
                Some(folder) => log::debug!("map '{}' is in unknown folder '{}'", map.id, folder),
            }
        }

        Self {
            roots,
            children,
            maps: by_folder,
            loose_maps,
        }
    }

    fn children_of(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn maps_in(&self, id: &str) -> &[usize] {
        self.maps.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Nest folders under their parents and file maps into their folders.
///
/// Folders whose parent id matches no folder are left out of the tree, as
/// are maps pointing at an unknown folder; maps with no folder appear only
/// in `all_mind_maps`.
pub fn build_hierarchy(folders: Vec<Folder>, maps: Vec<MindMapSummary>) -> Hierarchy {
    let index = Index::build(&folders, &maps);
    let mut visited = HashSet::new();

    let root_folders = index
        .roots
        .iter()
        .filter_map(|&i| assemble_node(i, &folders, &maps, &index, &mut visited))
        .collect();

    Hierarchy {
        root_folders,
        all_folders: folders,
        all_mind_maps: maps,
    }
}

fn assemble_node(
    i: usize,
    folders: &[Folder],
    maps: &[MindMapSummary],
    index: &Index<'_>,
    visited: &mut HashSet<usize>,
) -> Option<FolderNode> {
    // Duplicate ids can make a folder reachable twice
    if !visited.insert(i) {
        return None;
    }
    let folder = &folders[i];
    let children = index
        .children_of(&folder.id)
        .iter()
        .filter_map(|&c| assemble_node(c, folders, maps, index, visited))
        .collect();
    let mind_maps = index
        .maps_in(&folder.id)
        .iter()
        .map(|&m| maps[m].clone())
        .collect();

    Some(FolderNode {
        folder: folder.clone(),
        children,
        mind_maps,
    })
}

/// Build the sidebar tree: folders first, then maps, each level ordered by
/// `sort_order`. Maps with no folder sit at the top level.
pub fn build_folder_tree(folders: &[Folder], maps: &[MindMapSummary]) -> Vec<TreeItem> {
    let index = Index::build(folders, maps);
    let mut visited = HashSet::new();

    let mut items: Vec<TreeItem> = index
        .roots
        .iter()
        .filter_map(|&i| assemble_item(i, folders, maps, &index, &mut visited))
        .collect();
    items.extend(index.loose_maps.iter().map(|&m| map_item(&maps[m])));

    sort_items(&mut items);
    items
}

fn assemble_item(
    i: usize,
    folders: &[Folder],
    maps: &[MindMapSummary],
    index: &Index<'_>,
    visited: &mut HashSet<usize>,
) -> Option<TreeItem> {
    if !visited.insert(i) {
        return None;
    }
    let folder = &folders[i];

    let mut children: Vec<TreeItem> = index
        .children_of(&folder.id)
        .iter()
        .filter_map(|&c| assemble_item(c, folders, maps, index, visited))
        .collect();
    children.extend(index.maps_in(&folder.id).iter().map(|&m| map_item(&maps[m])));

    Some(TreeItem {
        id: folder.id.clone(),
        name: folder.name.clone(),
        kind: TreeItemKind::Folder,
        children: Some(children),
        icon: Some(folder.icon.clone()),
        color: Some(folder.color.clone()),
        is_expanded: Some(folder.is_expanded),
        sort_order: folder.sort_order,
        parent_id: folder.parent().map(str::to_string),
    })
}

fn map_item(map: &MindMapSummary) -> TreeItem {
    TreeItem {
        id: map.id.clone(),
        name: map.title.clone(),
        kind: TreeItemKind::MindMap,
        children: None,
        icon: None,
        color: None,
        is_expanded: None,
        sort_order: map.sort_order,
        parent_id: map.folder().map(str::to_string),
    }
}

fn sort_items(items: &mut [TreeItem]) {
    items.sort_by_key(|item| (item.kind != TreeItemKind::Folder, item.sort_order));
    for item in items.iter_mut() {
        if let Some(children) = item.children.as_mut() {
            sort_items(children);
        }
    }
}

/// Breadcrumb for a folder, e.g. `Work / Projects / 2024`
pub fn folder_path(folders: &[Folder], folder_id: Option<&str>) -> String {
    let Some(mut current) = folder_id.filter(|id| !id.is_empty()) else {
        return String::new();
    };
    let by_id: HashMap<&str, &Folder> = folders.iter().map(|f| (f.id.as_str(), f)).collect();

    let mut names = Vec::new();
    let mut seen = HashSet::new();
    while let Some(folder) = by_id.get(current) {
        if !seen.insert(current) {
            break;
        }
        names.push(folder.name.as_str());
        match folder.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    names.reverse();
    names.join(" / ")
}

/// Check that `folder_id` may be re-parented under `new_parent`
/// (`None` = top level)
pub fn validate_folder_move(folders: &[Folder], folder_id: &str, new_parent: Option<&str>) -> Result<()> {
    let by_id: HashMap<&str, &Folder> = folders.iter().map(|f| (f.id.as_str(), f)).collect();

    if !by_id.contains_key(folder_id) {
        bail!("Folder '{}' not found", folder_id);
    }
    let Some(target) = new_parent.filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    if !by_id.contains_key(target) {
        bail!("Target folder '{}' not found", target);
    }

    // Walk up from the target; meeting the moved folder means a cycle
    let mut current = Some(target);
    let mut seen = HashSet::new();
    while let Some(id) = current {
        if id == folder_id {
            bail!("Cannot move folder '{}' into itself or one of its sub-folders", folder_id);
        }
        if !seen.insert(id) {
            break;
        }
        current = by_id.get(id).and_then(|f| f.parent());
    }

    Ok(())
}

/// A destination offered when moving a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTarget {
    /// `None` is the top level
    pub folder_id: Option<String>,
    pub name: String,
}

pub const ROOT_TARGET_NAME: &str = "Root (No Folder)";

/// Top level plus every folder except the one the map already lives in
pub fn move_targets(folders: &[Folder], current_folder: Option<&str>) -> Vec<MoveTarget> {
    let current = current_folder.filter(|id| !id.is_empty());

    std::iter::once(MoveTarget {
        folder_id: None,
        name: ROOT_TARGET_NAME.to_string(),
    })
    .chain(
        folders
            .iter()
            .filter(|f| Some(f.id.as_str()) != current)
            .map(|f| MoveTarget {
                folder_id: Some(f.id.clone()),
                name: f.name.clone(),
            }),
    )
    .collect()
}
