//! File-based schema versioning.
//!
//! A schema directory holds one file per version plus a `current` file with
//! the full schema. A fresh database gets the `current` file; a versioned one
//! gets every newer versioned file in order. The applied version lives in the
//! `_schema_info` table.

mod applier;
mod resolver;
mod template;

pub(crate) use self::applier::{apply_upgrade_path, read_schema_version};
pub use self::applier::{SCHEMA_TABLE, SCHEMA_VERSION_VARIABLE};
pub use self::resolver::{resolve_upgrade_path, SchemaFile, UpgradePath, CURRENT_VERSION};
pub use self::template::SchemaFileTemplate;
