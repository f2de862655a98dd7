//! sendrepo: push local project directories to remote hosts with rsync.
//!
//! This crate resolves the YAML configuration and global exclude list, builds
//! the sync plan for one project and runs its hooks and transfer.

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod exclude;
pub mod hook;
pub mod logging;
pub mod path;
pub mod plan;
pub mod runner;
pub mod send;
pub mod sysexits;
pub mod template;

pub use config::{Config, ProjectSpec};
pub use error::{Error, Result};
pub use exclude::GlobalExcludes;
pub use plan::{Invocation, SyncPlan, build_plan};
