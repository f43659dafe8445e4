//! # Core Types
//!
//! This crate defines the fundamental types shared by the resource store,
//! the resource tree and its front ends.
//!
//! ## Key Types
//!
//! - [`ResourceId`]: Arena handle naming one resource in a store
//! - [`ResourceType`]: Optional free-form tag carried by a resource
//! - [`AttributeValue`]: Closed set of structured attribute values
//! - [`Attributes`]: Key-ordered attribute mapping

pub mod attributes;
pub mod ids;
pub mod resource_type;

pub use attributes::{attributes, AttributeValue, Attributes, DisplayAttributes};
pub use ids::ResourceId;
pub use resource_type::ResourceType;
