//! Resource tree operations
//!
//! This module defines the path-level contract offered by the resource tree
//! and the errors its callers observe.

use core_types::{Attributes, ResourceId, ResourceType};
use resource_path::PathError;
use resource_store::{NodeError, PersistenceError};
use thiserror::Error;

/// Errors that can occur during tree operations
///
/// Node-level failures are re-raised here carrying the full path the caller
/// passed in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Some path segment does not resolve
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// The terminal name collides with a live edge
    #[error("Path already exists: {0}")]
    PathAlreadyExists(String),

    /// The path is malformed or names the root where a leaf is required
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Resolution followed a cyclic chain of links
    #[error("Link cycle detected: {0}")]
    CycleDetected(String),

    /// The tree could not be restored from a snapshot
    #[error("Store error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl TreeError {
    /// Re-raises a node-level error as the path-level error for `path`
    pub fn from_node(err: NodeError, path: &str) -> Self {
        match err {
            NodeError::ChildNotFound { .. } | NodeError::Dangling(_) => {
                TreeError::PathNotFound(path.to_string())
            }
            NodeError::ChildAlreadyExists { .. } => TreeError::PathAlreadyExists(path.to_string()),
            NodeError::CycleDetected(_) => TreeError::CycleDetected(path.to_string()),
        }
    }

    /// Re-raises a parse error as [`TreeError::InvalidPath`] for `path`
    pub fn from_path(err: PathError, path: &str) -> Self {
        TreeError::InvalidPath {
            path: path.to_string(),
            reason: err.reason(),
        }
    }

    /// Returns the same error reported against `path`
    pub fn rebase(self, path: &str) -> Self {
        match self {
            TreeError::PathNotFound(_) => TreeError::PathNotFound(path.to_string()),
            TreeError::PathAlreadyExists(_) => TreeError::PathAlreadyExists(path.to_string()),
            TreeError::InvalidPath { reason, .. } => TreeError::InvalidPath {
                path: path.to_string(),
                reason,
            },
            TreeError::CycleDetected(_) => TreeError::CycleDetected(path.to_string()),
            other => other,
        }
    }

    /// Returns the path the error was raised for, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            TreeError::PathNotFound(p)
            | TreeError::PathAlreadyExists(p)
            | TreeError::InvalidPath { path: p, .. }
            | TreeError::CycleDetected(p) => Some(p),
            TreeError::Persistence(_) => None,
        }
    }
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Path-based operations over a resource tree
///
/// Each operation maps one-to-one onto a verb a front end exposes (resolve,
/// create, link, fetch, update, list, remove, move). Operations that resolve
/// paths take `&mut self` because resolution evicts dead edges lazily.
pub trait TreeOperations {
    /// Resolves a path to the resource it names
    ///
    /// The empty path (after trimming slashes) names the root.
    fn locate(&mut self, path: &str) -> TreeResult<ResourceId>;

    /// Creates a resource, creating missing ancestors first
    fn create(
        &mut self,
        path: &str,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
    ) -> TreeResult<ResourceId>;

    /// Links an existing resource at a new path
    ///
    /// A hard link attaches the same identity again; a soft link attaches a
    /// new link resource delegating to it. A trailing slash on `path` places
    /// the link inside that container under the target's own name.
    fn link(&mut self, path: &str, target: &str, hard: bool) -> TreeResult<ResourceId>;

    /// Returns the attributes of the resource at `path`
    fn fetch(&mut self, path: &str) -> TreeResult<Attributes>;

    /// Merges attributes into the resource at `path`, returning the result
    fn update(&mut self, path: &str, attributes: Attributes) -> TreeResult<Attributes>;

    /// Lists child names under `path`
    fn list(&mut self, path: &str) -> TreeResult<Vec<String>>;

    /// Lists children under `path` together with their attributes
    fn list_entries(&mut self, path: &str) -> TreeResult<Vec<(String, Attributes)>>;

    /// Detaches the edge at `path` and returns the resource it pointed at
    ///
    /// Note: This does NOT destroy the resource; other hard links keep it
    /// alive.
    fn remove(&mut self, path: &str) -> TreeResult<ResourceId>;

    /// Moves the edge at `old_path` to `new_path`
    ///
    /// Either the move happens completely or the tree is left unchanged.
    fn move_resource(
        &mut self,
        old_path: &str,
        new_path: &str,
        create_path: bool,
    ) -> TreeResult<ResourceId>;

    /// Renders the tree for diagnostics
    fn tree(&mut self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_errors_map_to_path_errors() {
        let not_found = NodeError::ChildNotFound {
            parent: ResourceId::ROOT,
            name: "b".to_string(),
        };
        assert_eq!(
            TreeError::from_node(not_found, "/a/b"),
            TreeError::PathNotFound("/a/b".to_string())
        );

        let exists = NodeError::ChildAlreadyExists {
            parent: ResourceId::ROOT,
            name: "b".to_string(),
        };
        assert_eq!(
            TreeError::from_node(exists, "/a/b"),
            TreeError::PathAlreadyExists("/a/b".to_string())
        );

        assert_eq!(
            TreeError::from_node(NodeError::Dangling(ResourceId::new(3)), "/c"),
            TreeError::PathNotFound("/c".to_string())
        );
        assert_eq!(
            TreeError::from_node(NodeError::CycleDetected(ResourceId::new(3)), "/c"),
            TreeError::CycleDetected("/c".to_string())
        );
    }

    #[test]
    fn test_rebase_keeps_kind() {
        let err = TreeError::PathNotFound("a/b".to_string()).rebase("/a/b/c");
        assert_eq!(err, TreeError::PathNotFound("/a/b/c".to_string()));
        assert_eq!(err.path(), Some("/a/b/c"));
    }

    #[test]
    fn test_invalid_path_keeps_reason() {
        let parse_err = resource_path::PathResolver::split_path("/a/../b").unwrap_err();
        let err = TreeError::from_path(parse_err, "/a/../b");

        assert_eq!(err.path(), Some("/a/../b"));
        assert!(err.to_string().contains("relative path components"));

        let rebased = err.rebase("/x");
        assert_eq!(rebased.path(), Some("/x"));
        assert!(rebased.to_string().contains("relative path components"));
    }

    #[test]
    fn test_persistence_error_has_no_path() {
        let err: TreeError = PersistenceError::MissingRoot.into();
        assert_eq!(err.path(), None);
        assert_eq!(err.clone().rebase("/x"), err);
    }
}
