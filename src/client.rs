use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{validate_schema_dir, AdbiConfig, DEFAULT_SCHEMA_FILE_FORMAT};
use crate::cursor::AdbiCursor;
use crate::error::{AdbiError, Result};
use crate::schema::{
    apply_upgrade_path, read_schema_version, resolve_upgrade_path, SchemaFileTemplate, UpgradePath,
};
use crate::traits::DatabaseDriver;
use crate::types::ParamStyle;

/// Main entry point for adbi.
///
/// Wraps a driver so callers can always write `%s` / `%(name)s` markers,
/// and keeps the database schema at the latest version found in a schema
/// directory.
pub struct AdbiConnection {
    driver: Arc<dyn DatabaseDriver>,
    param_style: ParamStyle,
    schema_dir: Option<PathBuf>,
    schema_file_format: SchemaFileTemplate,
}

impl AdbiConnection {
    /// Wrap a driver. Without an explicit `param_style` the driver is asked
    /// for its native one.
    ///
    /// # Example
    /// ```ignore
    /// let driver = Arc::new(DuckDbDriver::in_memory()?);
    /// let conn = AdbiConnection::connect(driver, None)?;
    /// ```
    pub fn connect(
        driver: Arc<dyn DatabaseDriver>,
        param_style: Option<ParamStyle>,
    ) -> Result<Self> {
        let param_style = param_style
            .or_else(|| driver.param_style())
            .ok_or(AdbiError::UndiscoverableParamStyle)?;
        debug!(param_style = %param_style, "connected");
        Ok(Self {
            driver,
            param_style,
            schema_dir: None,
            schema_file_format: SchemaFileTemplate::new(DEFAULT_SCHEMA_FILE_FORMAT)?,
        })
    }

    /// Wrap a driver using the settings of an `AdbiConfig`.
    pub fn with_config(driver: Arc<dyn DatabaseDriver>, config: &AdbiConfig) -> Result<Self> {
        let mut conn = Self::connect(driver, config.param_style)?;
        conn.set_schema_file_format(&config.schema_file_format)?;
        if let Some(dir) = &config.schema_dir {
            conn.set_schema_dir(dir)?;
        }
        Ok(conn)
    }

    /// The paramstyle operations are rewritten into.
    pub fn param_style(&self) -> ParamStyle {
        self.param_style
    }

    /// Create a cursor for this connection.
    pub async fn cursor(&self) -> Result<AdbiCursor> {
        let inner = self.driver.cursor().await?;
        Ok(AdbiCursor::new(
            inner,
            self.param_style,
            self.driver.capabilities(),
        ))
    }

    pub async fn commit(&self) -> Result<()> {
        self.driver.commit().await
    }

    /// Roll back the pending transaction. A no-op for drivers that do not
    /// support rollback.
    pub async fn rollback(&self) -> Result<()> {
        if self.driver.capabilities().rollback {
            self.driver.rollback().await
        } else {
            Ok(())
        }
    }

    pub async fn close(&self) -> Result<()> {
        self.driver.close().await
    }

    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Set the directory holding schema files. It must already exist.
    pub fn set_schema_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        validate_schema_dir(&dir)?;
        self.schema_dir = Some(dir);
        Ok(())
    }

    pub fn schema_file_format(&self) -> &str {
        self.schema_file_format.as_str()
    }

    /// Set the schema file name template, e.g. `schema-{version}.sql`.
    pub fn set_schema_file_format(&mut self, format: &str) -> Result<()> {
        self.schema_file_format = SchemaFileTemplate::new(format)?;
        Ok(())
    }

    /// The schema version recorded in the database. Nothing is written; a
    /// database without the version table reads as unversioned.
    pub async fn current_schema_version(&self) -> Result<Option<String>> {
        read_schema_version(self).await
    }

    /// The scripts `update_schema` would run, without running them.
    pub async fn upgrade_path(&self) -> Result<UpgradePath> {
        let dir = self.schema_dir.as_deref().ok_or(AdbiError::SchemaDirNotSet)?;
        let current = self.current_schema_version().await?;
        resolve_upgrade_path(dir, &self.schema_file_format, current.as_deref())
    }

    /// Bring the database to the latest schema version and return the path taken.
    pub async fn update_schema(&self) -> Result<UpgradePath> {
        let path = self.upgrade_path().await?;
        apply_upgrade_path(self, &path).await?;
        Ok(path)
    }
}
