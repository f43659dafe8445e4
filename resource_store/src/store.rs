//! Resource arena and node-level operations
//!
//! Every resource lives in the store and is addressed by [`ResourceId`].
//! Edges and links hold identifiers, never references, so the whole graph can
//! alias and even cycle without shared ownership.

use crate::error::{NodeError, NodeResult};
use crate::resource::{LinkedResource, RealResource, Resource};
use core_types::{AttributeValue, Attributes, ResourceId, ResourceType};
use tracing::{debug, trace};

/// Owns every resource ever allocated
///
/// Resources are never freed: removing an edge only decrements a counter, and
/// a dead resource stays resident (and addressable by ID) for the store's
/// lifetime. Identifiers are therefore gap-free and never reused.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    /// Resources in allocation order; index is `id - 1`
    resources: Vec<Resource>,
    next_id: u64,
}

impl ResourceStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn from_resources(resources: Vec<Resource>) -> Self {
        // Only valid because ids are allocated gap-free from 1 and never
        // reused: the next id is one past the record count.
        let next_id = resources.len() as u64 + 1;
        Self { resources, next_id }
    }

    fn take_id(&mut self) -> ResourceId {
        let id = ResourceId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocates a new real resource
    pub fn alloc_real(
        &mut self,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
    ) -> ResourceId {
        let id = self.take_id();
        self.resources
            .push(Resource::Real(RealResource::new(id, resource_type, attributes)));
        debug!(%id, "allocated real resource");
        id
    }

    /// Allocates a new soft link delegating to `target`
    pub fn alloc_linked(&mut self, target: ResourceId) -> ResourceId {
        let id = self.take_id();
        self.resources
            .push(Resource::Linked(LinkedResource::new(id, target)));
        debug!(%id, %target, "allocated linked resource");
        id
    }

    /// Returns the resource with this ID, if allocated
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(Self::index_of(id)?)
    }

    /// Position of `id` in the arena
    fn index_of(id: ResourceId) -> Option<usize> {
        usize::try_from(id.as_u64()).ok()?.checked_sub(1)
    }

    /// Returns the resource with this ID
    ///
    /// # Panics
    ///
    /// Panics if the ID was never allocated by this store. Identifiers only
    /// reach callers through path resolution, so an unknown ID is a broken
    /// store invariant rather than a recoverable condition.
    pub fn lookup(&self, id: ResourceId) -> &Resource {
        match self.get(id) {
            Some(resource) => resource,
            None => panic!("resource store invariant violated: {} was never allocated", id),
        }
    }

    fn real_mut(&mut self, id: ResourceId) -> &mut RealResource {
        let resource = Self::index_of(id).and_then(|index| self.resources.get_mut(index));
        match resource.and_then(Resource::as_real_mut) {
            Some(real) => real,
            None => panic!("resource store invariant violated: {} is not a real resource", id),
        }
    }

    fn real(&self, id: ResourceId) -> &RealResource {
        match self.lookup(id).as_real() {
            Some(real) => real,
            None => panic!("resource store invariant violated: {} is not a real resource", id),
        }
    }

    /// Number of resources ever allocated
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates over all resources in allocation order
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Returns true if an edge pointing at `id` counts as live
    ///
    /// A real resource is live while its hardlink count is positive; the root
    /// is live by construction. Link edges are always live.
    pub fn is_live(&self, id: ResourceId) -> bool {
        match self.lookup(id) {
            Resource::Real(real) => id.is_root() || real.hardlink_count() > 0,
            Resource::Linked(_) => true,
        }
    }

    /// Follows links from `id` to the real resource they end at
    ///
    /// A real `id` resolves to itself. When at least one link was followed and
    /// the final resource is dead, the chain is dangling.
    pub fn resolve(&self, id: ResourceId) -> NodeResult<ResourceId> {
        let mut visited = Vec::new();
        let mut current = id;
        loop {
            match self.lookup(current) {
                Resource::Real(_) => break,
                Resource::Linked(link) => {
                    visited.push(current);
                    if visited.contains(&link.target()) {
                        return Err(NodeError::CycleDetected(id));
                    }
                    trace!(from = %current, to = %link.target(), "delegating through link");
                    current = link.target();
                }
            }
        }

        if !visited.is_empty() && !self.is_live(current) {
            return Err(NodeError::Dangling(id));
        }
        Ok(current)
    }

    /// Drops dead edges from a real resource
    fn evict_dead(&mut self, parent: ResourceId) {
        let dead: Vec<(String, ResourceId)> = self
            .real(parent)
            .edges()
            .iter()
            .filter(|(_, target)| !self.is_live(*target))
            .cloned()
            .collect();
        if dead.is_empty() {
            return;
        }

        for (name, target) in &dead {
            debug!(%parent, name = %name, %target, "evicting dead edge");
        }
        self.real_mut(parent)
            .retain_edges(|edge| !dead.contains(edge));
    }

    /// Returns true if `parent` has a live edge named `name`
    ///
    /// A dead edge found under that name is evicted as a side effect.
    pub fn contains(&mut self, parent: ResourceId, name: &str) -> NodeResult<bool> {
        let parent = self.resolve(parent)?;
        let Some(target) = self.real(parent).edge(name) else {
            return Ok(false);
        };

        if self.is_live(target) {
            return Ok(true);
        }

        debug!(%parent, name, %target, "evicting dead edge");
        self.real_mut(parent).take_edge(name);
        Ok(false)
    }

    /// Returns the resource behind the live edge `name` of `parent`
    pub fn index(&mut self, parent: ResourceId, name: &str) -> NodeResult<ResourceId> {
        let real_parent = self.resolve(parent)?;
        if !self.contains(real_parent, name)? {
            return Err(NodeError::ChildNotFound {
                parent: real_parent,
                name: name.to_string(),
            });
        }

        self.real(real_parent)
            .edge(name)
            .ok_or_else(|| NodeError::ChildNotFound {
                parent: real_parent,
                name: name.to_string(),
            })
    }

    /// Attaches `node` under `parent` as `name`
    ///
    /// A real `node` gains one hardlink; a link has no counter to update.
    pub fn add_child(
        &mut self,
        parent: ResourceId,
        name: &str,
        node: ResourceId,
    ) -> NodeResult<ResourceId> {
        self.attach(parent, name, node, None)
    }

    /// Re-attaches an edge detached by [`Self::take_child`] at its old position
    pub fn restore_child(
        &mut self,
        parent: ResourceId,
        name: &str,
        node: ResourceId,
        position: usize,
    ) -> NodeResult<ResourceId> {
        self.attach(parent, name, node, Some(position))
    }

    fn attach(
        &mut self,
        parent: ResourceId,
        name: &str,
        node: ResourceId,
        position: Option<usize>,
    ) -> NodeResult<ResourceId> {
        let parent = self.resolve(parent)?;
        if self.contains(parent, name)? {
            return Err(NodeError::ChildAlreadyExists {
                parent,
                name: name.to_string(),
            });
        }

        let real_parent = self.real_mut(parent);
        match position {
            Some(position) => real_parent.insert_edge(position, name.to_string(), node),
            None => real_parent.push_edge(name.to_string(), node),
        }
        if matches!(self.lookup(node), Resource::Real(_)) {
            self.real_mut(node).increment_hardlinks();
        }
        Ok(node)
    }

    /// Detaches the live edge `name` from `parent` and returns its target
    ///
    /// A real target loses one hardlink and may become dead; it is never
    /// freed.
    pub fn remove_child(&mut self, parent: ResourceId, name: &str) -> NodeResult<ResourceId> {
        self.take_child(parent, name).map(|(_, node)| node)
    }

    /// Like [`Self::remove_child`], also returning the position the edge held
    /// among the parent's edges
    pub fn take_child(
        &mut self,
        parent: ResourceId,
        name: &str,
    ) -> NodeResult<(usize, ResourceId)> {
        let parent = self.resolve(parent)?;
        if !self.contains(parent, name)? {
            return Err(NodeError::ChildNotFound {
                parent,
                name: name.to_string(),
            });
        }

        let (position, node) = self
            .real_mut(parent)
            .take_edge(name)
            .ok_or_else(|| NodeError::ChildNotFound {
                parent,
                name: name.to_string(),
            })?;
        if matches!(self.lookup(node), Resource::Real(_)) {
            self.real_mut(node).decrement_hardlinks();
        }
        Ok((position, node))
    }

    /// Returns the live `(name, id)` edges of `parent` in insertion order
    pub fn children(&mut self, parent: ResourceId) -> NodeResult<Vec<(String, ResourceId)>> {
        let parent = self.resolve(parent)?;
        self.evict_dead(parent);
        Ok(self.real(parent).edges().to_vec())
    }

    /// Returns the names of the live edges of `parent` in insertion order
    pub fn child_names(&mut self, parent: ResourceId) -> NodeResult<Vec<String>> {
        Ok(self
            .children(parent)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// Returns a copy of the attributes of the resource `id` resolves to
    pub fn fetch_attributes(&self, id: ResourceId) -> NodeResult<Attributes> {
        let id = self.resolve(id)?;
        Ok(self.real(id).attributes().clone())
    }

    /// Merges `partial` into the attributes of the resource `id` resolves to
    ///
    /// Returns a copy of the merged attributes.
    pub fn update_attributes<I>(&mut self, id: ResourceId, partial: I) -> NodeResult<Attributes>
    where
        I: IntoIterator<Item = (String, AttributeValue)>,
    {
        let id = self.resolve(id)?;
        Ok(self.real_mut(id).merge_attributes(partial).clone())
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::attributes;

    fn store_with_root() -> (ResourceStore, ResourceId) {
        let mut store = ResourceStore::new();
        let root = store.alloc_real(Some("ROOT".into()), Attributes::new());
        (store, root)
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());
        let link = store.alloc_linked(a);

        assert_eq!(root, ResourceId::ROOT);
        assert_eq!(a, ResourceId::new(2));
        assert_eq!(link, ResourceId::new(3));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_unknown_id() {
        let (store, _) = store_with_root();
        assert!(store.get(ResourceId::new(9)).is_none());
        assert!(store.get(ResourceId::new(0)).is_none());
    }

    #[test]
    #[should_panic(expected = "never allocated")]
    fn test_lookup_unknown_id_panics() {
        let (store, _) = store_with_root();
        store.lookup(ResourceId::new(9));
    }

    #[test]
    #[should_panic(expected = "not a real resource")]
    fn test_mutating_id_zero_panics() {
        let (mut store, _) = store_with_root();
        store.real_mut(ResourceId::new(0));
    }

    #[test]
    fn test_index_of_matches_allocation_order() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());

        assert_eq!(ResourceStore::index_of(root), Some(0));
        assert_eq!(ResourceStore::index_of(a), Some(1));
        assert_eq!(ResourceStore::index_of(ResourceId::new(0)), None);
        store.real_mut(a).increment_hardlinks();
        assert_eq!(store.real(a).hardlink_count(), 1);
    }

    #[test]
    fn test_add_child_counts_hardlinks() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());

        store.add_child(root, "a", a).unwrap();
        store.add_child(root, "alias", a).unwrap();

        assert_eq!(store.lookup(a).as_real().unwrap().hardlink_count(), 2);
        assert_eq!(store.index(root, "alias").unwrap(), a);
    }

    #[test]
    fn test_add_duplicate_child() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());
        let b = store.alloc_real(None, Attributes::new());
        store.add_child(root, "a", a).unwrap();

        let result = store.add_child(root, "a", b);
        assert_eq!(
            result,
            Err(NodeError::ChildAlreadyExists {
                parent: root,
                name: "a".to_string()
            })
        );
        assert_eq!(store.lookup(b).as_real().unwrap().hardlink_count(), 0);
    }

    #[test]
    fn test_link_child_has_no_counter() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());
        store.add_child(root, "a", a).unwrap();
        let link = store.alloc_linked(a);
        store.add_child(root, "soft", link).unwrap();

        assert_eq!(store.lookup(a).as_real().unwrap().hardlink_count(), 1);
        store.remove_child(root, "soft").unwrap();
        assert_eq!(store.lookup(a).as_real().unwrap().hardlink_count(), 1);
    }

    #[test]
    fn test_remove_child_keeps_resource_resident() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, attributes([("k", "v")]));
        store.add_child(root, "a", a).unwrap();

        assert_eq!(store.remove_child(root, "a").unwrap(), a);
        assert!(!store.is_live(a));
        assert_eq!(store.fetch_attributes(a).unwrap(), attributes([("k", "v")]));
        assert!(matches!(
            store.remove_child(root, "a"),
            Err(NodeError::ChildNotFound { .. })
        ));
    }

    #[test]
    fn test_restore_child_keeps_position() {
        let (mut store, root) = store_with_root();
        for name in ["a", "b", "c"] {
            let id = store.alloc_real(None, Attributes::new());
            store.add_child(root, name, id).unwrap();
        }

        let (position, b) = store.take_child(root, "b").unwrap();
        assert_eq!(position, 1);
        assert_eq!(store.lookup(b).as_real().unwrap().hardlink_count(), 0);

        store.restore_child(root, "b", b, position).unwrap();
        assert_eq!(store.child_names(root).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.lookup(b).as_real().unwrap().hardlink_count(), 1);
    }

    #[test]
    fn test_dead_edges_are_evicted_lazily() {
        let (mut store, root) = store_with_root();
        let parent = store.alloc_real(None, Attributes::new());
        store.add_child(root, "p", parent).unwrap();
        let a = store.alloc_real(None, Attributes::new());
        store.add_child(root, "a", a).unwrap();
        store.add_child(parent, "alias", a).unwrap();

        store.remove_child(root, "a").unwrap();
        store.remove_child(parent, "alias").unwrap();
        assert!(store.lookup(parent).as_real().unwrap().edges().is_empty());

        // Re-attach under a second name, then kill it from the other side.
        let b = store.alloc_real(None, Attributes::new());
        store.add_child(root, "b", b).unwrap();
        store.add_child(parent, "b-alias", b).unwrap();
        store.remove_child(root, "b").unwrap();
        store.real_mut(b).decrement_hardlinks();

        // The edge is still recorded until someone looks at it.
        assert_eq!(store.lookup(parent).as_real().unwrap().edges().len(), 1);
        assert!(!store.contains(parent, "b-alias").unwrap());
        assert!(store.lookup(parent).as_real().unwrap().edges().is_empty());
    }

    #[test]
    fn test_children_in_insertion_order() {
        let (mut store, root) = store_with_root();
        for name in ["zh", "us", "hosts"] {
            let id = store.alloc_real(None, Attributes::new());
            store.add_child(root, name, id).unwrap();
        }

        assert_eq!(store.child_names(root).unwrap(), vec!["zh", "us", "hosts"]);
        let children = store.children(root).unwrap();
        assert_eq!(children[1], ("us".to_string(), ResourceId::new(3)));
    }

    #[test]
    fn test_link_delegates_reads_and_writes() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, attributes([("k", "v")]));
        store.add_child(root, "a", a).unwrap();
        let child = store.alloc_real(None, Attributes::new());
        store.add_child(a, "inner", child).unwrap();
        let link = store.alloc_linked(a);

        assert_eq!(store.fetch_attributes(link).unwrap(), attributes([("k", "v")]));
        assert_eq!(store.index(link, "inner").unwrap(), child);
        assert_eq!(store.child_names(link).unwrap(), vec!["inner"]);

        store
            .update_attributes(link, attributes([("k", "v2")]))
            .unwrap();
        assert_eq!(store.fetch_attributes(a).unwrap(), attributes([("k", "v2")]));
    }

    #[test]
    fn test_link_chain_resolves_transitively() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());
        store.add_child(root, "a", a).unwrap();
        let first = store.alloc_linked(a);
        let second = store.alloc_linked(first);

        assert_eq!(store.resolve(second).unwrap(), a);
    }

    #[test]
    fn test_dangling_link() {
        let (mut store, root) = store_with_root();
        let a = store.alloc_real(None, Attributes::new());
        store.add_child(root, "a", a).unwrap();
        let link = store.alloc_linked(a);
        store.add_child(root, "soft", link).unwrap();

        store.remove_child(root, "a").unwrap();

        assert!(store.contains(root, "soft").unwrap());
        assert_eq!(store.fetch_attributes(link), Err(NodeError::Dangling(link)));
    }

    #[test]
    fn test_link_to_root_is_never_dangling() {
        let (mut store, root) = store_with_root();
        let link = store.alloc_linked(root);
        assert_eq!(store.resolve(link).unwrap(), root);
    }

    #[test]
    fn test_cycle_detected() {
        let store = ResourceStore::from_resources(vec![
            Resource::Real(RealResource::new(ResourceId::ROOT, None, Attributes::new())),
            Resource::Linked(LinkedResource::new(ResourceId::new(2), ResourceId::new(3))),
            Resource::Linked(LinkedResource::new(ResourceId::new(3), ResourceId::new(2))),
        ]);

        assert_eq!(
            store.resolve(ResourceId::new(2)),
            Err(NodeError::CycleDetected(ResourceId::new(2)))
        );
        assert_eq!(
            store.fetch_attributes(ResourceId::new(3)),
            Err(NodeError::CycleDetected(ResourceId::new(3)))
        );
    }

    #[test]
    fn test_self_link_is_a_cycle() {
        let store = ResourceStore::from_resources(vec![
            Resource::Real(RealResource::new(ResourceId::ROOT, None, Attributes::new())),
            Resource::Linked(LinkedResource::new(ResourceId::new(2), ResourceId::new(2))),
        ]);

        assert!(matches!(
            store.resolve(ResourceId::new(2)),
            Err(NodeError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_next_id_after_restore() {
        let mut store = ResourceStore::from_resources(vec![Resource::Real(RealResource::new(
            ResourceId::ROOT,
            None,
            Attributes::new(),
        ))]);
        assert_eq!(store.alloc_real(None, Attributes::new()), ResourceId::new(2));
    }
}
