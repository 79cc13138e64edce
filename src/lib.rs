//! adbi - an agnostic database interface
//!
//! Write SQL once with `%s` / `%(name)s` markers and run it against drivers
//! that expect `?`, `:1`, `:name` or `%s`. A schema directory of versioned
//! SQL files keeps the database at its latest schema.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use adbi::{AdbiConnection, Params};
//! use adbi::drivers::DuckDbDriver;
//!
//! let mut conn = AdbiConnection::connect(Arc::new(DuckDbDriver::in_memory()?), None)?;
//! conn.set_schema_dir("db/schema")?;
//! conn.update_schema().await?;
//!
//! let mut curs = conn.cursor().await?;
//! curs.execute(
//!     "SELECT name FROM users WHERE id = %(id)s",
//!     Some(Params::named([("id", 42)])),
//! )
//! .await?;
//! let row = curs.fetch_one().await?;
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod placeholders;
pub mod schema;
pub mod traits;
pub mod types;

mod client;
mod cursor;

// Re-export main types for convenient access
pub use client::AdbiConnection;
pub use config::AdbiConfig;
pub use cursor::AdbiCursor;
pub use error::{AdbiError, Result};
pub use schema::{SchemaFile, UpgradePath};
pub use traits::{Capabilities, DatabaseDriver, DriverCursor};
pub use types::{ColumnDescription, ParamStyle, Params, Row, SqlValue};
