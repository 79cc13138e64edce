//! Connection configuration, loadable from TOML.
//!
//! ```toml
//! schema_dir = "db/schema"
//! schema_file_format = "schema-{version}.sql"
//! param_style = "qmark"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AdbiError, Result};
use crate::schema::SchemaFileTemplate;
use crate::types::ParamStyle;

pub const DEFAULT_SCHEMA_FILE_FORMAT: &str = "schema-{version}.sql";

#[derive(Debug, Clone, PartialEq)]
pub struct AdbiConfig {
    /// Directory holding the schema files. Must exist.
    pub schema_dir: Option<PathBuf>,

    /// File name template with exactly one `{version}` field.
    pub schema_file_format: String,

    /// Overrides the paramstyle the driver reports.
    pub param_style: Option<ParamStyle>,
}

/// On-disk shape. The style stays a string here so an unknown name surfaces
/// as `UnsupportedParamStyle` instead of a TOML error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    schema_dir: Option<PathBuf>,

    #[serde(default = "default_schema_file_format")]
    schema_file_format: String,

    #[serde(default)]
    param_style: Option<String>,
}

fn default_schema_file_format() -> String {
    DEFAULT_SCHEMA_FILE_FORMAT.to_string()
}

impl Default for AdbiConfig {
    fn default() -> Self {
        Self {
            schema_dir: None,
            schema_file_format: default_schema_file_format(),
            param_style: None,
        }
    }
}

impl ConfigFile {
    fn into_config(self) -> Result<AdbiConfig> {
        Ok(AdbiConfig {
            schema_dir: self.schema_dir,
            schema_file_format: self.schema_file_format,
            param_style: self
                .param_style
                .as_deref()
                .map(str::parse::<ParamStyle>)
                .transpose()?,
        })
    }
}

impl AdbiConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(raw).map_err(|e| AdbiError::Config(e.to_string()))?;
        let config = file.into_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file. A relative `schema_dir` is
    /// resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AdbiError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
            AdbiError::Config(format!("failed to parse config file {}: {e}", path.display()))
        })?;
        let mut config = file.into_config()?;
        if let Some(dir) = config.schema_dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.schema_dir = Some(if dir.is_absolute() { dir } else { base.join(dir) });
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.schema_dir {
            validate_schema_dir(dir)?;
        }
        SchemaFileTemplate::new(&self.schema_file_format)?;
        Ok(())
    }
}

pub(crate) fn validate_schema_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(AdbiError::InvalidSchemaDir(dir.to_path_buf()))
    }
}
