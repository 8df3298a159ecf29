//! Reusable argument groups shared across commands.

pub mod output;

pub use output::{OutputArgs, OutputFormat};
