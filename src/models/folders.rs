use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level folder name mapped to its subfolder names, in listing order.
///
/// A top-level folder without subfolders maps to an empty list.
pub type FolderTree = IndexMap<String, Vec<String>>;

/// One entry of a listing-service `contents` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}
