//! Argument parsing and dispatch

use crate::commands::{parse_attribute, CommandHandler};
use crate::store_file;
use anyhow::Result;
use clap::{Parser, Subcommand};
use core_types::{AttributeValue, Attributes};
use resource_tree::TreeConfig;
use std::path::PathBuf;

/// Path-addressed resource tree backed by a JSON store file
#[derive(Debug, Parser)]
#[command(name = "restree", version)]
pub struct Cli {
    /// Store file to load and write back
    #[arg(long, env = "RESTREE_STORE", default_value = "restree.json")]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a resource, creating missing ancestors
    Create {
        path: String,
        /// Type tag of the new resource
        #[arg(long = "type")]
        resource_type: Option<String>,
        /// Attribute as KEY=VALUE; VALUE is JSON or plain text
        #[arg(long = "attr", value_parser = parse_attribute)]
        attrs: Vec<(String, AttributeValue)>,
    },
    /// Link an existing resource at a new path
    Link {
        path: String,
        target: String,
        /// Share the target's identity instead of creating a soft link
        #[arg(long)]
        hard: bool,
    },
    /// Print the attributes of a resource
    Fetch { path: String },
    /// Merge attributes into a resource
    Update {
        path: String,
        #[arg(long = "attr", value_parser = parse_attribute, required = true)]
        attrs: Vec<(String, AttributeValue)>,
    },
    /// List children of a resource
    Ls {
        #[arg(default_value = "/")]
        path: String,
        /// Show attributes next to each name
        #[arg(long)]
        long: bool,
    },
    /// Remove the edge at a path
    Rm { path: String },
    /// Move the edge at a path
    Mv {
        old: String,
        new: String,
        /// Create missing parents of the destination
        #[arg(long)]
        parents: bool,
    },
    /// Print the whole tree
    Tree,
}

impl Command {
    /// Returns true if the command changes the store
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::Link { .. }
                | Command::Update { .. }
                | Command::Rm { .. }
                | Command::Mv { .. }
        )
    }
}

fn collect(attrs: Vec<(String, AttributeValue)>) -> Attributes {
    attrs.into_iter().collect()
}

/// Runs one command against the store file and returns the text to print
pub fn run(cli: Cli) -> Result<String> {
    let tree = store_file::load(&cli.store, TreeConfig::default())?;
    let mut handler = CommandHandler::new(tree);
    let mutating = cli.command.is_mutating();

    let output = match cli.command {
        Command::Create {
            path,
            resource_type,
            attrs,
        } => handler.create(&path, resource_type.as_deref(), collect(attrs))?,
        Command::Link { path, target, hard } => handler.link(&path, &target, hard)?,
        Command::Fetch { path } => handler.fetch(&path)?,
        Command::Update { path, attrs } => handler.update(&path, collect(attrs))?,
        Command::Ls { path, long } => handler.ls(&path, long)?,
        Command::Rm { path } => handler.rm(&path)?,
        Command::Mv { old, new, parents } => handler.mv(&old, &new, parents)?,
        Command::Tree => handler.tree_dump(),
    };

    if mutating {
        store_file::save(handler.tree(), &cli.store)?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "restree",
            "--store",
            "s.json",
            "create",
            "/hosts/h1",
            "--type",
            "Host",
            "--attr",
            "os=Linux",
            "--attr",
            "port=22",
        ])
        .unwrap();

        assert_eq!(cli.store, PathBuf::from("s.json"));
        match cli.command {
            Command::Create {
                path,
                resource_type,
                attrs,
            } => {
                assert_eq!(path, "/hosts/h1");
                assert_eq!(resource_type.as_deref(), Some("Host"));
                assert_eq!(attrs[1], ("port".to_string(), AttributeValue::Integer(22)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_attr() {
        assert!(Cli::try_parse_from(["restree", "update", "/a"]).is_err());
    }

    #[test]
    fn test_bad_attr_rejected_at_parse() {
        assert!(Cli::try_parse_from(["restree", "create", "/a", "--attr", "oops"]).is_err());
    }

    #[test]
    fn test_mutating_commands() {
        let parse = |args: &[&str]| {
            let mut full = vec!["restree"];
            full.extend_from_slice(args);
            Cli::try_parse_from(full).unwrap().command
        };

        assert!(parse(&["rm", "/a"]).is_mutating());
        assert!(parse(&["mv", "/a", "/b", "--parents"]).is_mutating());
        assert!(!parse(&["ls"]).is_mutating());
        assert!(!parse(&["tree"]).is_mutating());
        assert!(!parse(&["fetch", "/a"]).is_mutating());
    }
}
