use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Per-sample verification policy.
///
/// `renamed_paths` maps a dot path to the exact text expected at that path
/// in the mutated tree; `ignored_paths` exempts whole subtrees from
/// verification. The default (empty) manifest permits no differences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub renamed_paths: HashMap<String, String>,
    #[serde(default)]
    pub ignored_paths: HashSet<String>,
}

/// Manifests for a corpus, keyed by sample id. Samples without an entry get
/// the empty manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestSet {
    #[serde(flatten)]
    entries: HashMap<String, Manifest>,
}

impl ManifestSet {
    pub fn for_sample(&self, sample_id: &str) -> Manifest {
        self.entries.get(sample_id).cloned().unwrap_or_default()
    }

    pub fn insert(&mut self, sample_id: impl Into<String>, manifest: Manifest) {
        self.entries.insert(sample_id.into(), manifest);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load a manifest set from a JSON file and validate every path key.
///
/// An unreadable file is fatal here; missing per-sample entries are not.
pub fn load_manifests(path: &Path) -> Result<ManifestSet> {
    let content = fs::read_to_string(path).map_err(|e| {
        AuditError::Manifest(format!("cannot read {}: {}", path.display(), e))
    })?;
    let set: ManifestSet = serde_json::from_str(&content)?;
    validate_paths(&set)?;
    Ok(set)
}

fn validate_paths(set: &ManifestSet) -> Result<()> {
    let path_syntax = Regex::new(r"^0(\.\d+)*$")?;

    for (sample_id, manifest) in &set.entries {
        let paths = manifest
            .renamed_paths
            .keys()
            .chain(manifest.ignored_paths.iter());
        for path in paths {
            if !path_syntax.is_match(path) {
                return Err(AuditError::Manifest(format!(
                    "sample {}: malformed path {:?}",
                    sample_id, path
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_manifest_is_empty() {
        let manifest = Manifest::default();
        assert!(manifest.renamed_paths.is_empty());
        assert!(manifest.ignored_paths.is_empty());
    }

    #[test]
    fn test_missing_sample_defaults_to_empty() {
        let set = ManifestSet::default();
        let manifest = set.for_sample("42");
        assert!(manifest.renamed_paths.is_empty());
        assert!(manifest.ignored_paths.is_empty());
    }

    #[test]
    fn test_load_manifests() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "0": {{
                    "renamed_paths": {{"0.0": "x_add", "0.1.0": "x_a"}},
                    "ignored_paths": ["0.2"]
                }},
                "1": {{}}
            }}"#
        )
        .unwrap();

        let set = load_manifests(file.path()).unwrap();

        assert_eq!(set.len(), 2);
        let manifest = set.for_sample("0");
        assert_eq!(manifest.renamed_paths["0.0"], "x_add");
        assert!(manifest.ignored_paths.contains("0.2"));

        // Partial entries fall back to defaults per field.
        let sparse = set.for_sample("1");
        assert!(sparse.renamed_paths.is_empty());
    }

    #[test]
    fn test_malformed_path_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"7": {{"renamed_paths": {{"1.0": "x"}}, "ignored_paths": []}}}}"#
        )
        .unwrap();

        let err = load_manifests(file.path()).unwrap_err();
        assert!(err.to_string().contains("malformed path"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(load_manifests(Path::new("/no/such/manifests.json")).is_err());
    }
}
