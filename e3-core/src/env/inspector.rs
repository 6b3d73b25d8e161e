//! Walks `siteMods` and reports installed modules and their versions

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::EnvConfig;
use crate::error::E3Error;

/// Metadata document state for one installed version
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    /// Parsed `<module>_meta.yaml`
    Document(serde_yaml_ng::Value),
    /// No metadata file for this version
    Missing,
    /// The file exists but could not be read or parsed
    Unreadable(String),
}

/// One installed version of a module
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledVersion {
    pub version: String,
    pub path: PathBuf,
    /// Only populated when metadata loading is enabled
    pub metadata: Option<Metadata>,
}

/// A module directory under `siteMods`
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledModule {
    pub name: String,
    pub path: PathBuf,
    pub versions: Vec<InstalledVersion>,
}

impl InstalledModule {
    pub fn version_names(&self) -> Vec<&str> {
        self.versions.iter().map(|v| v.version.as_str()).collect()
    }
}

/// Read-only view over an installed e3 environment
#[derive(Debug, Clone)]
pub struct Inspector {
    sitemods: PathBuf,
    load_metadata: bool,
}

impl Inspector {
    pub fn new(config: &EnvConfig) -> Self {
        Self::at(config.sitemods_path())
    }

    /// Inspector rooted at an explicit `siteMods` directory
    pub fn at(sitemods: impl Into<PathBuf>) -> Self {
        Self {
            sitemods: sitemods.into(),
            load_metadata: false,
        }
    }

    /// Also load each version's metadata document
    pub fn with_metadata(mut self, load: bool) -> Self {
        self.load_metadata = load;
        self
    }

    pub fn sitemods_path(&self) -> &Path {
        &self.sitemods
    }

    /// Every installed module, sorted by name
    pub fn list_modules(&self) -> Result<Vec<InstalledModule>> {
        let mut modules = subdirectories(&self.sitemods)?
            .into_iter()
            .map(|(name, path)| self.inspect(name, path))
            .collect::<Result<Vec<_>>>()?;

        modules.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(
            "Found {} installed module(s) in {}",
            modules.len(),
            self.sitemods.display()
        );
        Ok(modules)
    }

    /// A single installed module
    pub fn module(&self, name: &str) -> Result<InstalledModule> {
        let path = self.sitemods.join(name);
        let is_plain_name = Path::new(name).file_name().map(|n| n == name).unwrap_or(false);

        if !is_plain_name || !path.is_dir() {
            return Err(E3Error::ModuleNotInstalled {
                name: name.to_string(),
                sitemods: self.sitemods.clone(),
            }
            .into());
        }

        self.inspect(name.to_string(), path)
    }

    fn inspect(&self, name: String, path: PathBuf) -> Result<InstalledModule> {
        let mut versions: Vec<InstalledVersion> = subdirectories(&path)?
            .into_iter()
            .map(|(version, version_path)| {
                let metadata = self
                    .load_metadata
                    .then(|| load_metadata(&version_path, &name));
                InstalledVersion {
                    version,
                    path: version_path,
                    metadata,
                }
            })
            .collect();

        versions.sort_by(|a, b| compare_versions(&a.version, &b.version));

        Ok(InstalledModule {
            name,
            path,
            versions,
        })
    }
}

/// `<version dir>/<module>_meta.yaml`
pub fn metadata_file(version_dir: &Path, module_name: &str) -> PathBuf {
    version_dir.join(format!("{module_name}_meta.yaml"))
}

fn load_metadata(version_dir: &Path, module_name: &str) -> Metadata {
    let path = metadata_file(version_dir, module_name);
    if !path.is_file() {
        return Metadata::Missing;
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            serde_yaml_ng::from_str::<serde_yaml_ng::Value>(&content).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(document) => Metadata::Document(document),
        Err(reason) => {
            tracing::warn!("Could not load metadata {}: {}", path.display(), reason);
            Metadata::Unreadable(reason)
        }
    }
}

/// Immediate subdirectories of `dir` as (name, path)
fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        found.push((name, entry.into_path()));
    }

    Ok(found)
}

/// Semantic version order where both sides parse, plain string order otherwise
fn compare_versions(a: &str, b: &str) -> Ordering {
    match (semver::Version::parse(a), semver::Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn install(root: &Path, module: &str, version: &str, meta: Option<&str>) {
        let dir = root.join(module).join(version);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = meta {
            fs::write(metadata_file(&dir, module), content).unwrap();
        }
    }

    #[test]
    fn test_versions_and_missing_metadata() {
        let temp_dir = TempDir::new().unwrap();
        install(temp_dir.path(), "motor", "7.0.1", Some("dependencies:\n  asyn: 4.42.0\n"));
        install(temp_dir.path(), "motor", "7.0.2", None);

        let module = Inspector::at(temp_dir.path())
            .with_metadata(true)
            .module("motor")
            .unwrap();

        assert_eq!(module.version_names(), vec!["7.0.1", "7.0.2"]);
        assert!(matches!(
            module.versions[0].metadata,
            Some(Metadata::Document(_))
        ));
        assert_eq!(module.versions[1].metadata, Some(Metadata::Missing));
    }

    #[test]
    fn test_metadata_not_loaded_by_default() {
        let temp_dir = TempDir::new().unwrap();
        install(temp_dir.path(), "asyn", "4.42.0", Some("a: 1\n"));

        let module = Inspector::at(temp_dir.path()).module("asyn").unwrap();
        assert_eq!(module.versions[0].metadata, None);
    }

    #[test]
    fn test_unparsable_metadata_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        install(temp_dir.path(), "asyn", "4.42.0", Some("key: [unclosed\n"));

        let module = Inspector::at(temp_dir.path())
            .with_metadata(true)
            .module("asyn")
            .unwrap();
        assert!(matches!(
            module.versions[0].metadata,
            Some(Metadata::Unreadable(_))
        ));
    }

    #[test]
    fn test_list_modules_sorted_and_ignores_files() {
        let temp_dir = TempDir::new().unwrap();
        install(temp_dir.path(), "stream", "2.8.22", None);
        install(temp_dir.path(), "asyn", "4.42.0", None);
        fs::write(temp_dir.path().join("README"), "not a module").unwrap();

        let modules = Inspector::at(temp_dir.path()).list_modules().unwrap();
        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["asyn", "stream"]);
    }

    #[test]
    fn test_version_order_is_semantic() {
        let temp_dir = TempDir::new().unwrap();
        for version in ["7.0.10", "7.0.9", "7.0.10+1"] {
            install(temp_dir.path(), "motor", version, None);
        }

        let module = Inspector::at(temp_dir.path()).module("motor").unwrap();
        assert_eq!(module.version_names(), vec!["7.0.9", "7.0.10", "7.0.10+1"]);
    }

    #[test]
    fn test_module_not_installed() {
        let temp_dir = TempDir::new().unwrap();

        let err = Inspector::at(temp_dir.path()).module("motor").unwrap_err();
        let e3_err = err.downcast_ref::<E3Error>().unwrap();
        assert!(e3_err.is_not_found());
    }

    #[test]
    fn test_module_name_cannot_escape_sitemods() {
        let temp_dir = TempDir::new().unwrap();
        let sitemods = temp_dir.path().join("siteMods");
        fs::create_dir_all(&sitemods).unwrap();
        install(temp_dir.path(), "outside", "1.0.0", None);

        let result = Inspector::at(&sitemods).module("../outside");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_sitemods_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Inspector::at(temp_dir.path().join("nope")).list_modules();
        assert!(result.is_err());
    }
}
