//! Command-line interface module.

mod args;
pub mod apply;
pub mod pages;
pub mod validate;

pub use args::{ApplyArgs, Cli, Commands};
