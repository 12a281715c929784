//! Fallback folder catalog served when neither the cache nor the listing
//! service can provide a tree.

use std::path::Path;

use crate::{error::AppError, models::folders::FolderTree};

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Algorithms",
        &[
            "Backtracking",
            "Binary Search",
            "Dynamic Programming",
            "Greedy",
            "Recursion",
            "Sorting",
            "Two Pointers",
        ],
    ),
    (
        "DS",
        &[
            "Arrays",
            "Graphs",
            "Hashing",
            "Heaps",
            "Linked Lists",
            "Stacks",
            "Queues",
            "Strings",
            "Trees",
        ],
    ),
    ("Problems", &["Easy", "Medium", "Hard"]),
];

/// The compiled-in catalog.
pub fn static_tree() -> FolderTree {
    BUILTIN
        .iter()
        .map(|(top, subs)| {
            (
                (*top).to_string(),
                subs.iter().map(|sub| (*sub).to_string()).collect(),
            )
        })
        .collect()
}

/// Loads an operator-supplied catalog, a JSON object of `"Top": ["Sub", ...]`.
pub fn load(path: &Path) -> Result<FolderTree, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw).map_err(|err| match err {
        AppError::Config(message) => {
            AppError::Config(format!("fallback catalog {}: {message}", path.display()))
        }
        other => other,
    })
}

fn parse(raw: &str) -> Result<FolderTree, AppError> {
    let tree: FolderTree = serde_json::from_str(raw)
        .map_err(|err| AppError::Config(format!("not a folder tree: {err}")))?;

    if tree.is_empty() {
        return Err(AppError::Config("catalog has no folders".into()));
    }
    if tree.keys().any(|top| top.is_empty()) {
        return Err(AppError::Config("catalog has an empty folder name".into()));
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_never_empty() {
        let tree = static_tree();
        assert!(!tree.is_empty());
        assert!(tree.keys().all(|top| !top.is_empty()));
        assert!(tree["DS"].contains(&"Arrays".to_string()));
    }

    #[test]
    fn parses_operator_catalog() {
        let tree = parse(r#"{"Graphs": ["BFS", "DFS"], "Misc": []}"#).unwrap();
        assert_eq!(tree["Graphs"], vec!["BFS", "DFS"]);
        assert!(tree["Misc"].is_empty());
    }

    #[test]
    fn keeps_operator_folder_order() {
        let tree = parse(r#"{"Zeta": [], "Alpha": ["B", "A"]}"#).unwrap();
        assert_eq!(tree.keys().collect::<Vec<_>>(), ["Zeta", "Alpha"]);
        assert_eq!(tree["Alpha"], vec!["B", "A"]);
    }

    #[test]
    fn rejects_bad_catalogs() {
        for raw in ["{}", r#"{"": ["a"]}"#, r#"["DS"]"#, r#"{"DS": "Arrays"}"#] {
            assert!(matches!(parse(raw), Err(AppError::Config(_))), "{raw}");
        }
    }

    #[test]
    fn load_reports_missing_file() {
        let missing = std::env::temp_dir().join("dsa-gateway-no-such-catalog.json");
        assert!(matches!(load(&missing), Err(AppError::Io(_))));
    }
}
