//! brick-reporter - publish an installed brick package's manifests to the
//! registry service.
//!
//! The pipeline runs once per package install/upgrade event:
//! gate check → collect manifests → resolve the registry address → two-phase
//! import (atoms first, then snippets). See [`pipeline::run`].

pub mod cli;
pub mod collector;
pub mod discovery;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod reporter;

pub use error::{ReporterError, Result};
