//! Path parsing logic
//!
//! This module handles splitting and joining slash-delimited resource paths.

use thiserror::Error;

/// Errors that can occur while parsing a path
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Path contains a malformed component
    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Path names the root where a leaf name is required
    #[error("Path has no leaf name: {0:?}")]
    MissingLeaf(String),
}

impl PathError {
    /// Returns the path the error was raised for
    pub fn path(&self) -> &str {
        match self {
            PathError::InvalidPath { path, .. } => path,
            PathError::MissingLeaf(path) => path,
        }
    }

    /// Returns why the path was rejected
    pub fn reason(&self) -> &'static str {
        match self {
            PathError::InvalidPath { reason, .. } => *reason,
            PathError::MissingLeaf(_) => "path names the root where a leaf name is required",
        }
    }
}

/// Path resolver
///
/// Handles splitting paths into components and validating syntax. Leading and
/// trailing slashes never change which resource a path names; the empty path
/// (after trimming) names the root.
pub struct PathResolver;

impl PathResolver {
    /// Splits a path into components
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_path::PathResolver;
    ///
    /// let components = PathResolver::split_path("/hosts/10.0.0.1/root").unwrap();
    /// assert_eq!(components, vec!["hosts", "10.0.0.1", "root"]);
    ///
    /// assert!(PathResolver::split_path("/").unwrap().is_empty());
    /// ```
    pub fn split_path(path: &str) -> Result<Vec<&str>, PathError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let components: Vec<&str> = trimmed.split('/').collect();
        for component in &components {
            if component.is_empty() {
                return Err(PathError::InvalidPath {
                    path: path.to_string(),
                    reason: "path contains empty component",
                });
            }
            if *component == "." || *component == ".." {
                return Err(PathError::InvalidPath {
                    path: path.to_string(),
                    reason: "relative path components (. or ..) are not supported",
                });
            }
        }

        Ok(components)
    }

    /// Splits a path into its parent prefix and leaf name
    ///
    /// The prefix is returned without leading or trailing slashes; an empty
    /// prefix names the root.
    ///
    /// ```
    /// use resource_path::PathResolver;
    ///
    /// assert_eq!(PathResolver::split_last("/a/b/c").unwrap(), ("a/b", "c"));
    /// assert_eq!(PathResolver::split_last("c/").unwrap(), ("", "c"));
    /// ```
    pub fn split_last(path: &str) -> Result<(&str, &str), PathError> {
        // Validates every component, including the prefix ones.
        Self::split_path(path)?;

        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Err(PathError::MissingLeaf(path.to_string()));
        }

        Ok(match trimmed.rfind('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => ("", trimmed),
        })
    }

    /// Returns the last component of a path
    pub fn basename(path: &str) -> Result<&str, PathError> {
        Self::split_last(path).map(|(_, leaf)| leaf)
    }

    /// Returns true if the path marks a container prefix
    ///
    /// A trailing slash on the destination of a link or move means "place it
    /// inside this container, keeping its own name".
    pub fn is_container(path: &str) -> bool {
        path.ends_with('/')
    }

    /// Joins a prefix and a leaf name into a normalized absolute path
    pub fn join(prefix: &str, name: &str) -> String {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("/{}", name)
        } else {
            format!("/{}/{}", prefix, name)
        }
    }
}
