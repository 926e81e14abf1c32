//! Artifact collector.
//!
//! Validates an install directory and extracts the declared manifests into a
//! [`PackageBundle`]. Read-only filesystem access; no network I/O. The
//! package name is derived and suffix-checked before any manifest is read so
//! a misnamed package fails without touching its files.

use std::path::Path;

use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ReporterError, Result};

/// Suffix marking a brick package install directory.
pub const PACKAGE_SUFFIX: &str = "NB";

const BRICKS_MANIFEST: &str = "bricks.json";
const STORIES_MANIFEST: &str = "stories.json";
const SNIPPETS_MANIFEST: &str = "snippets.json";

/// Manifests collected from one install directory.
///
/// Only constructed after every validation gate passes; never partially
/// populated. Payloads stay opaque JSON because the pipeline forwards them
/// without interpreting their contents.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageBundle {
    pub package_name: String,
    pub bricks: Value,
    pub stories: Value,
    pub snippets: Value,
}

/// Read and validate `install_path`, producing a [`PackageBundle`].
///
/// `dist/bricks.json` is required; `dist/stories.json` and
/// `dist/snippets.json` are optional and fall back to an empty array and an
/// empty-snippets object respectively. An absent optional manifest means
/// "not yet generated", while a present-but-unparseable one is broken and
/// fails the run.
pub fn collect(install_path: &Path) -> Result<PackageBundle> {
    if !install_path.exists() {
        return Err(ReporterError::PathNotFound(install_path.to_path_buf()));
    }
    if !install_path.is_dir() {
        return Err(ReporterError::NotADirectory(install_path.to_path_buf()));
    }
    let package_name = package_name_of(install_path)?;

    let dist = install_path.join("dist");
    let bricks_path = dist.join(BRICKS_MANIFEST);
    if !bricks_path.exists() {
        return Err(ReporterError::MissingRequiredArtifact(bricks_path));
    }
    let bricks = read_manifest(&bricks_path)?;

    let stories = read_optional_manifest(&dist.join(STORIES_MANIFEST))?.unwrap_or_else(|| json!([]));
    let snippets = read_optional_manifest(&dist.join(SNIPPETS_MANIFEST))?
        .unwrap_or_else(|| json!({ "snippets": [] }));

    debug!(package = %package_name, "collected package bundle");
    Ok(PackageBundle {
        package_name,
        bricks,
        stories,
        snippets,
    })
}

/// Final path segment with trailing separators stripped, suffix-checked.
fn package_name_of(install_path: &Path) -> Result<String> {
    let name = install_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !name.ends_with(PACKAGE_SUFFIX) {
        return Err(ReporterError::InvalidPackageName(name));
    }
    Ok(name)
}

fn read_manifest(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| ReporterError::MalformedArtifact {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_manifest(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    read_manifest(path).map(Some)
}
