//! # Resource Tree
//!
//! This crate provides a path-addressed namespace over the resource store.
//!
//! ## Operations
//!
//! - `locate(path)`: Resolve a path to a resource
//! - `create(path, type, attributes)`: Create a resource and missing ancestors
//! - `link(path, target, hard)`: Alias an existing resource (hard or soft)
//! - `fetch(path)` / `update(path, attributes)`: Read or merge attributes
//! - `list(path)` / `list_entries(path)`: Enumerate children
//! - `remove(path)`: Detach an edge (the resource itself is never destroyed)
//! - `move_resource(old, new, create_path)`: Re-attach an edge atomically
//! - `tree()`: Diagnostic dump
//!
//! Node-level store errors surface as path-level [`TreeError`]s carrying the
//! path the caller passed in.

pub mod config;
mod dump;
pub mod operations;
pub mod tree;

pub use config::TreeConfig;
pub use operations::{TreeError, TreeOperations, TreeResult};
pub use tree::ResourceTree;
