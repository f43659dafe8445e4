//! Store file loading and saving

use anyhow::{Context, Result};
use resource_store::{from_json_bytes, to_json_bytes};
use resource_tree::{ResourceTree, TreeConfig};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Loads a tree from `path`
///
/// A missing file yields a fresh tree.
pub fn load(path: &Path, config: TreeConfig) -> Result<ResourceTree> {
    if !path.exists() {
        debug!(path = %path.display(), "store file missing, starting empty tree");
        return Ok(ResourceTree::with_config(config));
    }

    let bytes =
        fs::read(path).with_context(|| format!("failed to read store {}", path.display()))?;
    let snapshot = from_json_bytes(&bytes)
        .with_context(|| format!("failed to parse store {}", path.display()))?;
    let tree = ResourceTree::from_snapshot(snapshot, config)
        .with_context(|| format!("failed to restore store {}", path.display()))?;

    info!(path = %path.display(), resources = tree.store().len(), "loaded store");
    Ok(tree)
}

/// Writes `tree` to `path`
///
/// The snapshot goes to a sibling temporary file first and is renamed over
/// `path`, so a failed write never truncates the previous store.
pub fn save(tree: &ResourceTree, path: &Path) -> Result<()> {
    let bytes = to_json_bytes(&tree.snapshot()).context("failed to serialize store")?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, bytes).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;

    info!(path = %path.display(), resources = tree.store().len(), "saved store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{attributes, Attributes};
    use resource_tree::TreeOperations;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let mut tree = load(&dir.path().join("absent.json"), TreeConfig::default()).unwrap();
        assert!(tree.list("/").unwrap().is_empty());
        assert_eq!(tree.store().len(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut tree = ResourceTree::new();
        tree.create("/a/b", None, attributes([("k", "v")])).unwrap();
        tree.link("/c", "/a/b", false).unwrap();
        save(&tree, &path).unwrap();

        let mut loaded = load(&path, TreeConfig::default()).unwrap();
        assert_eq!(loaded.fetch("/c").unwrap(), attributes([("k", "v")]));
        assert_eq!(loaded.tree(), tree.tree());
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = load(&path, TreeConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse store"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut tree = ResourceTree::new();
        save(&tree, &path).unwrap();
        tree.create("/later", None, Attributes::new()).unwrap();
        save(&tree, &path).unwrap();

        let mut loaded = load(&path, TreeConfig::default()).unwrap();
        assert_eq!(loaded.list("/").unwrap(), vec!["later"]);
    }
}
