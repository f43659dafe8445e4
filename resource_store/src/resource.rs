//! Resource variants held by the store

use core_types::{AttributeValue, Attributes, ResourceId, ResourceType};
use std::fmt;

/// A resource owned by the store
///
/// Either a real data holder with attributes and child edges, or a soft link
/// delegating every operation to another resource. Dispatch between the two
/// happens explicitly in [`crate::ResourceStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Attribute holder and container
    Real(RealResource),
    /// Soft link to another resource
    Linked(LinkedResource),
}

impl Resource {
    /// Returns the resource ID
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Real(r) => r.id,
            Resource::Linked(l) => l.id,
        }
    }

    /// Returns true if this is a soft link
    pub fn is_link(&self) -> bool {
        matches!(self, Resource::Linked(_))
    }

    /// Tries to get as a real resource
    pub fn as_real(&self) -> Option<&RealResource> {
        match self {
            Resource::Real(r) => Some(r),
            Resource::Linked(_) => None,
        }
    }

    /// Tries to get as a linked resource
    pub fn as_linked(&self) -> Option<&LinkedResource> {
        match self {
            Resource::Linked(l) => Some(l),
            Resource::Real(_) => None,
        }
    }

    pub(crate) fn as_real_mut(&mut self) -> Option<&mut RealResource> {
        match self {
            Resource::Real(r) => Some(r),
            Resource::Linked(_) => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Real(r) => write!(f, "{} (real)", r.id),
            Resource::Linked(l) => write!(f, "{} (link to {})", l.id, l.target),
        }
    }
}

/// A resource holding attributes and child edges
#[derive(Debug, Clone, PartialEq)]
pub struct RealResource {
    id: ResourceId,
    resource_type: Option<ResourceType>,
    attributes: Attributes,
    /// Child edges in insertion order; may hold dead edges until next access
    children: Vec<(String, ResourceId)>,
    hardlink_count: u32,
}

impl RealResource {
    pub(crate) fn new(
        id: ResourceId,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            resource_type,
            attributes,
            children: Vec::new(),
            hardlink_count: 0,
        }
    }

    pub(crate) fn from_parts(
        id: ResourceId,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
        children: Vec<(String, ResourceId)>,
        hardlink_count: u32,
    ) -> Self {
        Self {
            id,
            resource_type,
            attributes,
            children,
            hardlink_count,
        }
    }

    /// Returns the resource ID
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the type tag
    pub fn resource_type(&self) -> Option<&ResourceType> {
        self.resource_type.as_ref()
    }

    /// Returns the current attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the number of hard edges pointing at this resource
    pub fn hardlink_count(&self) -> u32 {
        self.hardlink_count
    }

    /// Returns all recorded edges, including dead ones not yet evicted
    pub fn edges(&self) -> &[(String, ResourceId)] {
        &self.children
    }

    pub(crate) fn edge(&self, name: &str) -> Option<ResourceId> {
        self.children
            .iter()
            .find(|(edge_name, _)| edge_name == name)
            .map(|(_, id)| *id)
    }

    pub(crate) fn push_edge(&mut self, name: String, target: ResourceId) {
        self.children.push((name, target));
    }

    /// Inserts an edge at `position`, or last if the list is shorter
    pub(crate) fn insert_edge(&mut self, position: usize, name: String, target: ResourceId) {
        let position = position.min(self.children.len());
        self.children.insert(position, (name, target));
    }

    /// Removes the edge `name`, returning its position and target
    pub(crate) fn take_edge(&mut self, name: &str) -> Option<(usize, ResourceId)> {
        let pos = self
            .children
            .iter()
            .position(|(edge_name, _)| edge_name == name)?;
        Some((pos, self.children.remove(pos).1))
    }

    pub(crate) fn retain_edges<F>(&mut self, keep: F)
    where
        F: FnMut(&(String, ResourceId)) -> bool,
    {
        self.children.retain(keep);
    }

    pub(crate) fn increment_hardlinks(&mut self) {
        self.hardlink_count = self.hardlink_count.saturating_add(1);
    }

    pub(crate) fn decrement_hardlinks(&mut self) {
        self.hardlink_count = self.hardlink_count.saturating_sub(1);
    }

    /// Shallow merge: keys in `partial` overwrite or extend, others are kept
    pub(crate) fn merge_attributes<I>(&mut self, partial: I) -> &Attributes
    where
        I: IntoIterator<Item = (String, AttributeValue)>,
    {
        self.attributes.extend(partial);
        &self.attributes
    }
}

/// A soft link to another resource
///
/// Carries no attributes or children of its own and never counts toward the
/// target's liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedResource {
    id: ResourceId,
    target: ResourceId,
}

impl LinkedResource {
    pub(crate) fn new(id: ResourceId, target: ResourceId) -> Self {
        Self { id, target }
    }

    /// Returns the resource ID
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the ID this link delegates to
    pub fn target(&self) -> ResourceId {
        self.target
    }
}
