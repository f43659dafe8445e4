//! CLI Commands for the resource tree
//!
//! This module implements one handler method per command. Handlers return the
//! text to print; failures carry the command name as context.

use anyhow::{Context, Result};
use core_types::{AttributeValue, Attributes, DisplayAttributes, ResourceType};
use resource_tree::{ResourceTree, TreeOperations};

/// Parses a `KEY=VALUE` attribute argument
///
/// The value is read as JSON when it parses as an attribute value, otherwise
/// it is taken as plain text.
///
/// ```
/// use core_types::AttributeValue;
/// use restree_cli::parse_attribute;
///
/// assert_eq!(parse_attribute("port=22").unwrap().1, AttributeValue::Integer(22));
/// assert_eq!(parse_attribute("os=Linux").unwrap().1, AttributeValue::from("Linux"));
/// ```
pub fn parse_attribute(arg: &str) -> Result<(String, AttributeValue), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", arg))?;
    if key.is_empty() {
        return Err(format!("attribute key is empty in {:?}", arg));
    }

    let value = serde_json::from_str::<AttributeValue>(value)
        .unwrap_or_else(|_| AttributeValue::Text(value.to_string()));
    Ok((key.to_string(), value))
}

/// CLI Command handler
pub struct CommandHandler {
    tree: ResourceTree,
}

impl CommandHandler {
    /// Creates a handler over an existing tree
    pub fn new(tree: ResourceTree) -> Self {
        Self { tree }
    }

    /// Returns the tree
    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    /// Creates a resource
    ///
    /// Example: `restree create /hosts/h1 --type Host --attr os=Linux`
    pub fn create(
        &mut self,
        path: &str,
        resource_type: Option<&str>,
        attributes: Attributes,
    ) -> Result<String> {
        let id = self
            .tree
            .create(path, resource_type.map(ResourceType::new), attributes)
            .context("create failed")?;

        Ok(format!("Created {} as {}", path, id))
    }

    /// Links an existing resource at a new path
    ///
    /// Example: `restree link /alias /hosts/h1 --hard`
    pub fn link(&mut self, path: &str, target: &str, hard: bool) -> Result<String> {
        let id = self
            .tree
            .link(path, target, hard)
            .context("link failed")?;

        let kind = if hard { "hard" } else { "soft" };
        Ok(format!("Linked {} -> {} ({} link, {})", path, target, kind, id))
    }

    /// Prints the attributes of a resource as JSON
    ///
    /// Example: `restree fetch /hosts/h1`
    pub fn fetch(&mut self, path: &str) -> Result<String> {
        let attributes = self.tree.fetch(path).context("fetch failed")?;
        Ok(serde_json::to_string_pretty(&attributes)?)
    }

    /// Merges attributes into a resource and prints the result as JSON
    ///
    /// Example: `restree update /hosts/h1 --attr os=AIX`
    pub fn update(&mut self, path: &str, attributes: Attributes) -> Result<String> {
        let merged = self
            .tree
            .update(path, attributes)
            .context("update failed")?;
        Ok(serde_json::to_string_pretty(&merged)?)
    }

    /// Lists children of a resource
    ///
    /// Example: `restree ls /hosts --long`
    pub fn ls(&mut self, path: &str, long: bool) -> Result<String> {
        if !long {
            let names = self.tree.list(path).context("ls failed")?;
            return Ok(names.join("\n"));
        }

        let entries = self.tree.list_entries(path).context("ls failed")?;
        let lines: Vec<String> = entries
            .iter()
            .map(|(name, attributes)| format!("{}\t{}", name, DisplayAttributes(attributes)))
            .collect();
        Ok(lines.join("\n"))
    }

    /// Removes the edge at a path
    ///
    /// Example: `restree rm /hosts/h1`
    pub fn rm(&mut self, path: &str) -> Result<String> {
        let id = self.tree.remove(path).context("rm failed")?;
        Ok(format!("Removed {} ({})", path, id))
    }

    /// Moves the edge at a path
    ///
    /// Example: `restree mv /hosts/h1 /retired/ --parents`
    pub fn mv(&mut self, old_path: &str, new_path: &str, parents: bool) -> Result<String> {
        let id = self
            .tree
            .move_resource(old_path, new_path, parents)
            .context("mv failed")?;
        Ok(format!("Moved {} to {} ({})", old_path, new_path, id))
    }

    /// Renders the whole tree
    pub fn tree_dump(&mut self) -> String {
        self.tree.tree()
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new(ResourceTree::new())
    }
}
