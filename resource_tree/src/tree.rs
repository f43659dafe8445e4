//! Resource tree implementation
//!
//! This module provides the path facade over a [`ResourceStore`].

use crate::config::TreeConfig;
use crate::dump;
use crate::operations::{TreeError, TreeOperations, TreeResult};
use core_types::{Attributes, ResourceId, ResourceType};
use resource_path::PathResolver;
use resource_store::{NodeError, Resource, ResourceStore, StoreSnapshot};
use tracing::{debug, info, warn};

/// The resource tree
///
/// Owns the store holding every resource and the root they hang from. There
/// is no global instance; callers pass the tree explicitly.
#[derive(Debug, Clone)]
pub struct ResourceTree {
    store: ResourceStore,
    root: ResourceId,
    config: TreeConfig,
}

impl ResourceTree {
    /// Creates an empty tree with the default configuration
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates an empty tree
    pub fn with_config(config: TreeConfig) -> Self {
        let mut store = ResourceStore::new();
        let root = store.alloc_real(Some(config.root_type.clone()), Attributes::new());
        Self {
            store,
            root,
            config,
        }
    }

    /// Restores a tree from a snapshot
    ///
    /// The root is the first record of the snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot, config: TreeConfig) -> TreeResult<Self> {
        let store = ResourceStore::deserialize(snapshot)?;
        info!(resources = store.len(), "restored resource tree");
        Ok(Self {
            store,
            root: ResourceId::ROOT,
            config,
        })
    }

    /// Serializes every resource of the tree
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.serialize()
    }

    /// Returns the root resource ID
    pub fn root(&self) -> ResourceId {
        self.root
    }

    /// Returns the configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Returns the underlying store
    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Returns a resource previously returned by a tree operation
    pub fn resource(&self, id: ResourceId) -> &Resource {
        self.store.lookup(id)
    }

    /// Resolves `prefix`, creating it (and its ancestors) when missing
    fn ensure_parent(&mut self, prefix: &str) -> TreeResult<ResourceId> {
        match self.locate(prefix) {
            Ok(parent) => Ok(parent),
            Err(TreeError::PathNotFound(_)) => {
                debug!(prefix, "creating missing ancestor");
                self.create_at(prefix, None, Attributes::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fails with [`TreeError::PathAlreadyExists`] if `parent` has a live `name`
    fn ensure_vacant(&mut self, parent: ResourceId, name: &str, path: &str) -> TreeResult<()> {
        let taken = self
            .store
            .contains(parent, name)
            .map_err(|e| TreeError::from_node(e, path))?;
        if taken {
            return Err(TreeError::PathAlreadyExists(path.to_string()));
        }
        Ok(())
    }

    fn create_at(
        &mut self,
        path: &str,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
    ) -> TreeResult<ResourceId> {
        let (prefix, name) =
            PathResolver::split_last(path).map_err(|e| TreeError::from_path(e, path))?;

        let parent = self.ensure_parent(prefix)?;
        self.ensure_vacant(parent, name, path)?;

        let node = self.store.alloc_real(resource_type, attributes);
        self.store
            .add_child(parent, name, node)
            .map_err(|e| TreeError::from_node(e, path))?;
        info!(path, %node, "created resource");
        Ok(node)
    }

    /// Parent and leaf name for a link or move destination
    ///
    /// A container destination keeps `fallback_name`; anything else supplies
    /// its own leaf.
    fn destination<'a>(dest: &'a str, fallback_name: &'a str) -> TreeResult<(&'a str, &'a str)> {
        if PathResolver::is_container(dest) {
            PathResolver::split_path(dest).map_err(|e| TreeError::from_path(e, dest))?;
            Ok((dest.trim_matches('/'), fallback_name))
        } else {
            PathResolver::split_last(dest).map_err(|e| TreeError::from_path(e, dest))
        }
    }

    fn attach_moved(
        &mut self,
        node: ResourceId,
        name: &str,
        new_path: &str,
        create_path: bool,
    ) -> TreeResult<ResourceId> {
        let (prefix, name) = Self::destination(new_path, name)?;

        let parent = match self.locate(prefix) {
            Ok(parent) => parent,
            Err(TreeError::PathNotFound(_)) if create_path => self
                .create_at(prefix, None, Attributes::new())
                .map_err(|e| e.rebase(new_path))?,
            Err(e) => return Err(e.rebase(new_path)),
        };

        self.ensure_vacant(parent, name, new_path)?;
        self.store
            .add_child(parent, name, node)
            .map_err(|e| TreeError::from_node(e, new_path))
    }
}

impl Default for ResourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeOperations for ResourceTree {
    fn locate(&mut self, path: &str) -> TreeResult<ResourceId> {
        let components =
            PathResolver::split_path(path).map_err(|e| TreeError::from_path(e, path))?;

        let mut node = self.root;
        for component in components {
            node = self
                .store
                .index(node, component)
                .map_err(|e| TreeError::from_node(e, path))?;
        }
        Ok(node)
    }

    fn create(
        &mut self,
        path: &str,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
    ) -> TreeResult<ResourceId> {
        self.create_at(path, resource_type, attributes)
            .map_err(|e| e.rebase(path))
    }

    fn link(&mut self, path: &str, target: &str, hard: bool) -> TreeResult<ResourceId> {
        let target_name = if PathResolver::is_container(path) {
            PathResolver::basename(target).map_err(|e| TreeError::from_path(e, target))?
        } else {
            ""
        };
        let (prefix, name) = Self::destination(path, target_name)?;

        let target_node = self.locate(target)?;
        let parent = self.ensure_parent(prefix).map_err(|e| e.rebase(path))?;
        self.ensure_vacant(parent, name, path)?;

        let node = if hard {
            target_node
        } else {
            self.store.alloc_linked(target_node)
        };
        self.store
            .add_child(parent, name, node)
            .map_err(|e| TreeError::from_node(e, path))?;
        info!(path, target, hard, %node, "linked resource");
        Ok(node)
    }

    fn fetch(&mut self, path: &str) -> TreeResult<Attributes> {
        let node = self.locate(path)?;
        self.store
            .fetch_attributes(node)
            .map_err(|e| TreeError::from_node(e, path))
    }

    fn update(&mut self, path: &str, attributes: Attributes) -> TreeResult<Attributes> {
        let node = self.locate(path)?;
        let merged = self
            .store
            .update_attributes(node, attributes)
            .map_err(|e| TreeError::from_node(e, path))?;
        debug!(path, "updated attributes");
        Ok(merged)
    }

    fn list(&mut self, path: &str) -> TreeResult<Vec<String>> {
        let node = self.locate(path)?;
        self.store
            .child_names(node)
            .map_err(|e| TreeError::from_node(e, path))
    }

    fn list_entries(&mut self, path: &str) -> TreeResult<Vec<(String, Attributes)>> {
        let node = self.locate(path)?;
        let children = self
            .store
            .children(node)
            .map_err(|e| TreeError::from_node(e, path))?;

        let mut entries = Vec::with_capacity(children.len());
        for (name, child) in children {
            match self.store.fetch_attributes(child) {
                Ok(attributes) => entries.push((name, attributes)),
                Err(NodeError::Dangling(_)) => {
                    debug!(path, name = %name, "skipping dangling link in listing");
                }
                Err(e) => {
                    return Err(TreeError::from_node(e, &PathResolver::join(path, &name)));
                }
            }
        }
        Ok(entries)
    }

    fn remove(&mut self, path: &str) -> TreeResult<ResourceId> {
        let (prefix, name) =
            PathResolver::split_last(path).map_err(|e| TreeError::from_path(e, path))?;

        let parent = self.locate(prefix).map_err(|e| e.rebase(path))?;
        let node = self
            .store
            .remove_child(parent, name)
            .map_err(|e| TreeError::from_node(e, path))?;
        info!(path, %node, "removed edge");
        Ok(node)
    }

    fn move_resource(
        &mut self,
        old_path: &str,
        new_path: &str,
        create_path: bool,
    ) -> TreeResult<ResourceId> {
        let (old_prefix, name) =
            PathResolver::split_last(old_path).map_err(|e| TreeError::from_path(e, old_path))?;

        let old_parent = self.locate(old_prefix).map_err(|e| e.rebase(old_path))?;
        let (position, node) = self
            .store
            .take_child(old_parent, name)
            .map_err(|e| TreeError::from_node(e, old_path))?;

        match self.attach_moved(node, name, new_path, create_path) {
            Ok(node) => {
                info!(old_path, new_path, %node, "moved resource");
                Ok(node)
            }
            Err(e) => {
                warn!(old_path, new_path, error = %e, "move failed, restoring original edge");
                self.store
                    .restore_child(old_parent, name, node, position)
                    .map_err(|restore| TreeError::from_node(restore, old_path))?;
                Err(e)
            }
        }
    }

    fn tree(&mut self) -> String {
        dump::render(&mut self.store, self.root, &self.config)
    }
}
