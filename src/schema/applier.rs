use tracing::{debug, info, warn};

use crate::client::AdbiConnection;
use crate::cursor::AdbiCursor;
use crate::error::Result;
use crate::schema::UpgradePath;
use crate::types::Params;

pub const SCHEMA_TABLE: &str = "_schema_info";
pub const SCHEMA_VERSION_VARIABLE: &str = "schema_version";

fn select_version_sql() -> String {
    format!("SELECT value FROM {SCHEMA_TABLE} WHERE variable = '{SCHEMA_VERSION_VARIABLE}'")
}

fn create_schema_table_sql() -> String {
    format!(
        "CREATE TABLE {SCHEMA_TABLE} (
    variable VARCHAR(64) NOT NULL PRIMARY KEY,
    value VARCHAR(128) NOT NULL
)"
    )
}

fn update_version_sql() -> String {
    format!("UPDATE {SCHEMA_TABLE} SET value = %s WHERE variable = %s")
}

fn insert_version_sql() -> String {
    format!("INSERT INTO {SCHEMA_TABLE} (variable, value) VALUES (%s, %s)")
}

/// Create the version table unless a read from it succeeds.
async fn ensure_schema_table(conn: &AdbiConnection) -> Result<()> {
    let mut curs = conn.cursor().await?;
    if curs.execute(&select_version_sql(), None).await.is_err() {
        debug!(table = SCHEMA_TABLE, "creating schema version table");
        curs.execute(&create_schema_table_sql(), None).await?;
        curs.close().await?;
        conn.commit().await?;
    } else {
        curs.close().await?;
    }
    Ok(())
}

/// The persisted schema version, `None` for an unversioned database.
///
/// Read-only: a missing or unreadable version table counts as unversioned.
pub(crate) async fn read_schema_version(conn: &AdbiConnection) -> Result<Option<String>> {
    let mut curs = conn.cursor().await?;
    let version = match fetch_version(&mut curs).await {
        Ok(version) => version,
        Err(err) => {
            debug!(table = SCHEMA_TABLE, error = %err, "schema version table not readable");
            None
        }
    };
    curs.close().await?;
    Ok(version)
}

async fn fetch_version(curs: &mut AdbiCursor) -> Result<Option<String>> {
    curs.execute(&select_version_sql(), None).await?;
    let row = curs.fetch_one().await?;
    Ok(row.and_then(|row| row.get(0).and_then(|v| v.as_str()).map(str::to_string)))
}

/// Run every script of `path` in order, record its latest version and commit.
///
/// A failing script stops the run with the marker untouched; scripts applied
/// before it stay applied.
pub(crate) async fn apply_upgrade_path(conn: &AdbiConnection, path: &UpgradePath) -> Result<()> {
    ensure_schema_table(conn).await?;

    let mut curs = conn.cursor().await?;
    for script in &path.scripts {
        info!(
            version = %script.version,
            path = %script.path.display(),
            "applying schema script"
        );
        curs.execute_file(&script.path).await?;
    }

    match &path.latest_version {
        Some(version) => write_schema_version(&mut curs, version).await?,
        None => warn!("no versioned schema files found; schema version left unchanged"),
    }
    curs.close().await?;
    conn.commit().await
}

async fn write_schema_version(curs: &mut AdbiCursor, version: &str) -> Result<()> {
    if fetch_version(curs).await?.is_some() {
        curs.execute(
            &update_version_sql(),
            Some(Params::positional([version, SCHEMA_VERSION_VARIABLE])),
        )
        .await?;
    } else {
        curs.execute(
            &insert_version_sql(),
            Some(Params::positional([SCHEMA_VERSION_VARIABLE, version])),
        )
        .await?;
    }
    info!(version = %version, "schema version recorded");
    Ok(())
}
