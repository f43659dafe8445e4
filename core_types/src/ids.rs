//! Identifiers for resources in a store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a resource within one store
///
/// Identifiers are handed out in strictly increasing order starting at 1
/// and are never reused, even after the resource they name has become
/// unreachable. The first identifier of every store names the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Identifier of the root resource
    pub const ROOT: ResourceId = ResourceId(1);

    /// Creates a resource ID from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the identifier allocated right after this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns true if this identifier names the root
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource({})", self.0)
    }
}
