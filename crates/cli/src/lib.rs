//! Interactive console shell for the stockcard registry.
//!
//! Thin I/O glue: reads operator input, forwards it to the
//! [`stockcard_inventory::Registry`] and prints results. All validation lives
//! in the domain crates.

pub mod config;
pub mod prompt;
pub mod shell;

pub use config::{OutputFormat, ShellConfig};
pub use prompt::Prompter;
pub use shell::{Shell, ShellError};
