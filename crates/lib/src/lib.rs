//! cellar-lib: Core types and logic for cellar
//!
//! This crate provides the pieces of a source-build package tool:
//! - `Formula`: build recipes (`qt5`, `qtkeychain`)
//! - `BuildOptions` / `HostFacts`: the inputs of one build, resolved once
//! - `args`: the option-to-argument compiler for configure tools
//! - `execute`: fetching verified sources and running external tools
//! - `fixup`: post-install filesystem normalization
//! - `install`: the sequential pipeline tying it together

pub mod args;
pub mod config;
pub mod consts;
pub mod execute;
pub mod fixup;
pub mod formula;
pub mod host;
pub mod install;
pub mod layout;
pub mod options;
pub mod platform;
pub mod util;
