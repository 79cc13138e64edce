use async_trait::async_trait;

use crate::error::{AdbiError, Result};
use crate::types::{ColumnDescription, ParamStyle, Params, Row, SqlValue};

/// Optional operations a driver declares up front.
/// The facade consults these instead of probing the driver at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub rollback: bool,
    pub call_proc: bool,
    pub next_set: bool,
    pub execute_script: bool,
}

impl Capabilities {
    /// A driver supporting every optional operation.
    pub fn all() -> Self {
        Self {
            rollback: true,
            call_proc: true,
            next_set: true,
            execute_script: true,
        }
    }
}

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Reporting the placeholder style they accept natively
/// - Handing out cursors
/// - Committing, rolling back and closing the underlying connection
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Native placeholder style, or `None` when the driver cannot tell.
    fn param_style(&self) -> Option<ParamStyle>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    async fn cursor(&self) -> Result<Box<dyn DriverCursor>>;

    async fn commit(&self) -> Result<()>;

    async fn rollback(&self) -> Result<()> {
        Err(AdbiError::Unsupported("rollback"))
    }

    async fn close(&self) -> Result<()>;
}

/// A driver cursor. Statements arrive already rewritten into the
/// driver's native placeholder style.
#[async_trait]
pub trait DriverCursor: Send {
    async fn execute(&mut self, sql: &str, params: Option<&Params>) -> Result<()>;

    async fn execute_many(&mut self, sql: &str, params_list: &[Params]) -> Result<()>;

    async fn fetch_one(&mut self) -> Result<Option<Row>>;

    async fn fetch_many(&mut self, size: usize) -> Result<Vec<Row>>;

    async fn fetch_all(&mut self) -> Result<Vec<Row>>;

    /// Columns of the last result, `None` when the last statement produced none.
    fn description(&self) -> Option<Vec<ColumnDescription>>;

    fn row_count(&self) -> i64;

    fn array_size(&self) -> usize;

    fn set_array_size(&mut self, size: usize);

    fn set_input_sizes(&mut self, _sizes: &[Option<usize>]) -> Result<()> {
        Ok(())
    }

    fn set_output_size(&mut self, _size: usize, _column: Option<usize>) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()>;

    async fn call_proc(&mut self, _name: &str, _params: &[SqlValue]) -> Result<Vec<SqlValue>> {
        Err(AdbiError::Unsupported("callproc"))
    }

    async fn next_set(&mut self) -> Result<bool> {
        Err(AdbiError::Unsupported("nextset"))
    }

    async fn execute_script(&mut self, _script: &str) -> Result<()> {
        Err(AdbiError::Unsupported("executescript"))
    }
}
