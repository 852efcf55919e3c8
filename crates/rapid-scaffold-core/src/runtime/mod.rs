//! External tool detection and bootstrap steps
//!
//! This module provides:
//! - Detection of git, Node.js and the package manager
//! - The bootstrap runner (install, dev server)

pub mod bootstrap;
pub mod check;

pub use bootstrap::{BootstrapRunner, PackageManager};
pub use check::{check_prerequisites, RuntimeInfo};
