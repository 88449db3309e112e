//! reactup - React upgrade compatibility library
//!
//! This library checks the dependencies declared in a package.json against a
//! target React version:
//! - Peer range evaluation of every React-related dependency
//! - Nearest and latest compatible version search
//! - Companion upgrades required by the candidate versions
//! - Section-scoped, format-preserving manifest rewrites

pub mod cli;
pub mod compat;
pub mod domain;
pub mod error;
pub mod interaction;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod registry;
pub mod upgrade;
