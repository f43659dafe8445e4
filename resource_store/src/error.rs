//! Node-level errors raised by store operations

use core_types::ResourceId;
use thiserror::Error;

/// Errors raised while operating on a single resource and its child edges
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// No live edge with this name under the parent
    #[error("Child not found: {name:?} under {parent}")]
    ChildNotFound { parent: ResourceId, name: String },

    /// A live edge with this name already exists under the parent
    #[error("Child already exists: {name:?} under {parent}")]
    ChildAlreadyExists { parent: ResourceId, name: String },

    /// The link chain starting at this resource ends at a dead resource
    #[error("Dangling link: {0}")]
    Dangling(ResourceId),

    /// The link chain starting at this resource revisits a link
    #[error("Link cycle detected starting at {0}")]
    CycleDetected(ResourceId),
}

/// Result type for node-level operations
pub type NodeResult<T> = Result<T, NodeError>;
