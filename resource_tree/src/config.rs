//! Tree configuration

use core_types::ResourceType;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::ResourceTree`]
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Type tag given to the root of a fresh tree
    pub root_type: ResourceType,
    /// Spaces per nesting level in the diagnostic dump
    pub dump_indent: usize,
    /// Characters of a link target's attributes shown in the dump
    pub dump_preview_len: usize,
}

impl TreeConfig {
    /// Sets the root type tag
    pub fn with_root_type(mut self, root_type: impl Into<ResourceType>) -> Self {
        self.root_type = root_type.into();
        self
    }

    /// Sets the dump indent width
    pub fn with_dump_indent(mut self, indent: usize) -> Self {
        self.dump_indent = indent;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_type: ResourceType::new("ROOT"),
            dump_indent: 4,
            dump_preview_len: 50,
        }
    }
}
