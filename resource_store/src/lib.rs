//! # Resource Store
//!
//! This crate owns the resources of a resource tree.
//!
//! ## Design
//!
//! - **ResourceStore**: Arena allocating every resource under a [`ResourceId`]
//! - **Resource**: Closed sum of [`RealResource`] (attributes and child edges)
//!   and [`LinkedResource`] (soft link delegating to another id)
//! - **Hardlinks**: A real resource is alive while some edge counts toward it;
//!   dead edges are evicted lazily on next access
//! - **Persistence**: Whole-store snapshots with a versioned JSON form
//!
//! Resources are never freed and identifiers are never reused.

pub mod error;
pub mod persistence;
pub mod resource;
pub mod store;

pub use error::{NodeError, NodeResult};
pub use persistence::{
    from_json_bytes, to_json_bytes, PersistenceError, PersistenceResult, StoreRecord,
    StoreSnapshot,
};
pub use resource::{LinkedResource, RealResource, Resource};
pub use store::ResourceStore;
