use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AdbiError, Result};
use crate::schema::SchemaFileTemplate;

/// Version token of the file holding the full current schema.
pub const CURRENT_VERSION: &str = "current";

/// A schema file discovered in the schema directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    pub version: String,
    pub path: PathBuf,
}

/// Scripts to run, in order, and the version to record afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePath {
    pub scripts: Vec<SchemaFile>,
    pub latest_version: Option<String>,
}

impl UpgradePath {
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.scripts.iter().map(|s| s.path.as_path()).collect()
    }
}

/// Work out which schema scripts bring a database at `persisted` up to date.
///
/// Versions compare as plain strings, so `"10.0.0" < "2.0.0"`. The latest
/// version is whichever versioned file sorts last by file name, which is
/// not necessarily the greatest version string.
///
/// Without a persisted version the `current` schema file alone is returned.
pub fn resolve_upgrade_path(
    schema_dir: &Path,
    template: &SchemaFileTemplate,
    persisted: Option<&str>,
) -> Result<UpgradePath> {
    let mut entries = std::fs::read_dir(schema_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let mut versioned: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut latest_version = None;
    for path in entries {
        let Some(version) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| template.match_version(name))
            .map(str::to_string)
        else {
            continue;
        };
        if version == CURRENT_VERSION {
            continue;
        }
        debug!(version = %version, path = %path.display(), "found schema file");
        latest_version = Some(version.clone());
        versioned.insert(version, path);
    }

    let scripts = match persisted.filter(|v| !v.is_empty()) {
        None => {
            let file = template.file_name(CURRENT_VERSION);
            let path = schema_dir.join(&file);
            if !path.exists() {
                return Err(AdbiError::MissingCurrentSchema {
                    file,
                    dir: schema_dir.to_path_buf(),
                });
            }
            vec![SchemaFile {
                version: CURRENT_VERSION.to_string(),
                path,
            }]
        }
        Some(persisted) => versioned
            .into_iter()
            .filter(|(version, _)| version.as_str() > persisted)
            .map(|(version, path)| SchemaFile { version, path })
            .collect(),
    };

    Ok(UpgradePath {
        scripts,
        latest_version,
    })
}
