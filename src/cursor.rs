use std::path::Path;

use tracing::debug;

use crate::error::{AdbiError, Result};
use crate::placeholders::{convert, remap};
use crate::traits::{Capabilities, DriverCursor};
use crate::types::{ColumnDescription, ParamStyle, Params, Row, SqlValue};

/// Cursor wrapper that accepts operations in uniform notation.
///
/// `execute` and `execute_many` rewrite the operation into the driver's
/// paramstyle and reshape the parameters to match. Everything else is passed
/// straight to the driver cursor.
pub struct AdbiCursor {
    inner: Box<dyn DriverCursor>,
    style: ParamStyle,
    capabilities: Capabilities,
}

impl AdbiCursor {
    pub(crate) fn new(
        inner: Box<dyn DriverCursor>,
        style: ParamStyle,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            inner,
            style,
            capabilities,
        }
    }

    /// The paramstyle operations are rewritten into.
    pub fn param_style(&self) -> ParamStyle {
        self.style
    }

    /// Prepare and execute an operation.
    ///
    /// Positional parameters bind to `%s` markers, named parameters to
    /// `%(name)s` markers.
    pub async fn execute(&mut self, operation: &str, params: Option<Params>) -> Result<()> {
        let (operation, mapping) = convert(operation, params.as_ref(), self.style)?;
        let params = match (params, mapping) {
            (Some(params), Some(mapping)) if !mapping.is_empty() => Some(remap(&params, &mapping)?),
            (params, _) => params,
        };
        debug!(style = %self.style, sql = %operation, "execute");
        match params {
            Some(params) if !params.is_empty() => {
                self.inner.execute(&operation, Some(&params)).await
            }
            _ => self.inner.execute(&operation, None).await,
        }
    }

    /// Execute an operation once for every parameter set.
    ///
    /// The rewrite is derived from the first set only; every set must share
    /// its shape.
    pub async fn execute_many(&mut self, operation: &str, params_list: Vec<Params>) -> Result<()> {
        let (operation, mapping) = convert(operation, params_list.first(), self.style)?;
        let params_list = match mapping {
            Some(mapping) if !mapping.is_empty() => params_list
                .iter()
                .map(|params| remap(params, &mapping))
                .collect::<Result<Vec<_>>>()?,
            _ => params_list,
        };
        debug!(
            style = %self.style,
            sql = %operation,
            batch = params_list.len(),
            "execute_many"
        );
        self.inner.execute_many(&operation, &params_list).await
    }

    /// Fetch the next row, or `None` when the result is exhausted.
    pub async fn fetch_one(&mut self) -> Result<Option<Row>> {
        self.inner.fetch_one().await
    }

    /// Fetch up to `size` rows; `None` uses the cursor's array size.
    pub async fn fetch_many(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        let size = size.unwrap_or_else(|| self.inner.array_size());
        self.inner.fetch_many(size).await
    }

    pub async fn fetch_all(&mut self) -> Result<Vec<Row>> {
        self.inner.fetch_all().await
    }

    pub fn description(&self) -> Option<Vec<ColumnDescription>> {
        self.inner.description()
    }

    pub fn row_count(&self) -> i64 {
        self.inner.row_count()
    }

    pub fn array_size(&self) -> usize {
        self.inner.array_size()
    }

    pub fn set_array_size(&mut self, size: usize) {
        self.inner.set_array_size(size);
    }

    pub fn set_input_sizes(&mut self, sizes: &[Option<usize>]) -> Result<()> {
        self.inner.set_input_sizes(sizes)
    }

    pub fn set_output_size(&mut self, size: usize, column: Option<usize>) -> Result<()> {
        self.inner.set_output_size(size, column)
    }

    /// Call a stored procedure. Fails when the driver does not declare support.
    pub async fn call_proc(&mut self, name: &str, params: &[SqlValue]) -> Result<Vec<SqlValue>> {
        if !self.capabilities.call_proc {
            return Err(AdbiError::Unsupported("callproc"));
        }
        self.inner.call_proc(name, params).await
    }

    /// Skip to the next result set. Fails when the driver does not declare support.
    pub async fn next_set(&mut self) -> Result<bool> {
        if !self.capabilities.next_set {
            return Err(AdbiError::Unsupported("nextset"));
        }
        self.inner.next_set().await
    }

    /// Execute a multi-statement script, falling back to a plain execute
    /// when the driver has no native script support.
    pub async fn execute_script(&mut self, script: &str) -> Result<()> {
        if self.capabilities.execute_script {
            self.inner.execute_script(script).await
        } else {
            self.inner.execute(script, None).await
        }
    }

    /// Read a file and execute its contents as a script.
    pub async fn execute_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let script = tokio::fs::read_to_string(path.as_ref()).await?;
        self.execute_script(&script).await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }
}
