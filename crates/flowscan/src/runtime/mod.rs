//! Runtime module: boot, pipeline, rendering and the CLI entry.

pub mod boot;
pub mod cli;
pub mod pipeline;
pub mod render;
pub mod run;
