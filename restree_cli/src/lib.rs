//! # restree CLI
//!
//! Command-line front end for the resource tree. Each invocation loads the
//! store file, runs one command and writes the store back if it changed.
//!
//! ```text
//! restree create /hosts/h1 --type Host --attr os=Linux --attr port=22
//! restree link /alias /hosts/h1
//! restree ls /hosts --long
//! ```

pub mod cli;
pub mod commands;
pub mod store_file;

pub use cli::{run, Cli, Command};
pub use commands::{parse_attribute, CommandHandler};
