//! Diagnostic text dump of a tree
//!
//! One line per edge, indented by depth. Links show where they point. A
//! resource already on the current ancestor chain is marked and not descended
//! into again, so hard-link loops and links to ancestors terminate.

use crate::config::TreeConfig;
use core_types::{DisplayAttributes, ResourceId};
use resource_store::{NodeError, Resource, ResourceStore};

pub(crate) fn render(store: &mut ResourceStore, root: ResourceId, config: &TreeConfig) -> String {
    let mut out = String::new();
    let mut ancestors = Vec::new();
    render_node(store, "root", root, 0, &mut ancestors, config, &mut out);
    out
}

fn render_node(
    store: &mut ResourceStore,
    name: &str,
    id: ResourceId,
    depth: usize,
    ancestors: &mut Vec<ResourceId>,
    config: &TreeConfig,
    out: &mut String,
) {
    let indent = " ".repeat(depth * config.dump_indent);
    let is_link = store.lookup(id).is_link();

    let real = match store.resolve(id) {
        Ok(real) => real,
        Err(NodeError::Dangling(_)) => {
            out.push_str(&format!("{}{}: ==> (dangling)\n", indent, name));
            return;
        }
        Err(_) => {
            out.push_str(&format!("{}{}: ==> (cycle)\n", indent, name));
            return;
        }
    };

    let label = label(store, real, is_link, config);
    if ancestors.contains(&real) {
        out.push_str(&format!("{}{}: {} (cycle)\n", indent, name, label));
        return;
    }
    out.push_str(&format!("{}{}: {}\n", indent, name, label));

    let Ok(children) = store.children(real) else {
        return;
    };
    ancestors.push(real);
    for (child_name, child) in children {
        render_node(store, &child_name, child, depth + 1, ancestors, config, out);
    }
    ancestors.pop();
}

fn label(store: &ResourceStore, real: ResourceId, is_link: bool, config: &TreeConfig) -> String {
    let Some(Resource::Real(resource)) = store.get(real) else {
        return String::new();
    };

    let tag = resource
        .resource_type()
        .map(|t| t.as_str())
        .unwrap_or("-");
    let attrs = DisplayAttributes(resource.attributes()).to_string();

    if is_link {
        format!("==> [{}] {}", tag, preview(&attrs, config.dump_preview_len))
    } else {
        format!("[{}] {}", tag, attrs)
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
