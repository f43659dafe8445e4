//! # Resource Paths
//!
//! Parsing rules for the slash-delimited paths that address resources in a
//! resource tree.
//!
//! ## Grammar
//!
//! - Components are separated by `/`
//! - Leading and trailing slashes are insignificant for resolution
//! - The empty path names the root
//! - A trailing slash on a link or move destination marks a container prefix
//! - Empty components and `.` / `..` are rejected

pub mod path;

pub use path::{PathError, PathResolver};
