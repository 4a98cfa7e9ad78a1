//! `pyproject.toml` generation for a single-file script.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::imports::ENTRY_POINT;

/// Version stamped on every generated project.
pub const DEFAULT_VERSION: &str = "0.1.0";

pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Names and metadata derived from a script path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Console script / distribution name: file stem with `_` -> `-`.
    pub tool_name: String,
    /// Module name: tool name with `-` -> `_`.
    pub importable_name: String,
    pub version: String,
    pub dependencies: Vec<String>,
}

impl PackageDescriptor {
    pub fn new(script_path: &Path, dependencies: Vec<String>) -> Self {
        let stem = script_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tool_name = stem.replace('_', "-");
        let importable_name = tool_name.replace('-', "_");
        Self {
            tool_name,
            importable_name,
            version: DEFAULT_VERSION.to_string(),
            dependencies,
        }
    }

    /// `"<importable_name>:main"`
    pub fn entry_binding(&self) -> String {
        format!("{}:{}", self.importable_name, ENTRY_POINT)
    }

    /// Render the manifest as TOML.
    pub fn to_toml(&self) -> Result<String> {
        let doc = PyProject {
            build_system: BuildSystem {
                requires: vec!["setuptools".to_string(), "wheel".to_string()],
                build_backend: "setuptools.build_meta".to_string(),
            },
            project: Project {
                name: self.tool_name.clone(),
                version: self.version.clone(),
                description: format!("Auto-generated project for {}", self.tool_name),
                dependencies: self.dependencies.clone(),
                scripts: BTreeMap::from([(self.tool_name.clone(), self.entry_binding())]),
            },
        };
        toml::to_string(&doc).context("Serialize pyproject.toml")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PyProject {
    #[serde(rename = "build-system")]
    pub build_system: BuildSystem,
    pub project: Project,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildSystem {
    pub requires: Vec<String>,
    #[serde(rename = "build-backend")]
    pub build_backend: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub version: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub scripts: BTreeMap<String, String>,
}

/// Manifest text plus the importable name of the package it describes.
pub fn generate(script_path: &Path, dependencies: &[String]) -> Result<(String, String)> {
    let descriptor = PackageDescriptor::new(script_path, dependencies.to_vec());
    let text = descriptor.to_toml()?;
    Ok((text, descriptor.importable_name))
}

/// File name the script is staged under so it matches the importable name.
pub fn staged_file_name(script_path: &Path) -> PathBuf {
    let base = script_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(base.replace('-', "_"))
}

/// Stage an installable project in `dir`: the script under its import-safe
/// name next to a generated `pyproject.toml`.
pub fn write_project(
    script_path: &Path,
    dependencies: &[String],
    dir: &Path,
) -> Result<PackageDescriptor> {
    let descriptor = PackageDescriptor::new(script_path, dependencies.to_vec());
    let target = dir.join(staged_file_name(script_path));
    fs::copy(script_path, &target).with_context(|| {
        format!("Copy {} to {}", script_path.display(), target.display())
    })?;
    fs::write(dir.join(PYPROJECT_FILE), descriptor.to_toml()?).context("Write pyproject.toml")?;
    tracing::debug!(
        "Staged {} as {} in {}",
        script_path.display(),
        target.display(),
        dir.display()
    );
    Ok(descriptor)
}
