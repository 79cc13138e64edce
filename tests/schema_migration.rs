use std::path::Path;
use std::sync::Arc;

use adbi::drivers::{DuckDbDriver, InMemoryTestDriver, QueryKind, RecordedQuery};
use adbi::error::AdbiError;
use adbi::traits::DatabaseDriver;
use adbi::types::{ParamStyle, Params};
use adbi::{AdbiConfig, AdbiConnection};
use tempfile::TempDir;

const SCHEMA_CURRENT: &str = "
CREATE TABLE table_one (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL);
INSERT INTO table_one VALUES (1, 'foo'), (2, 'bar'), (3, 'baz');
CREATE TABLE table_two (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL);
INSERT INTO table_two VALUES (4, 'foofoo'), (5, 'foobar');
";

const SCHEMA_0_1_0: &str = "
CREATE TABLE table_one (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL);
INSERT INTO table_one VALUES (1, 'foo'), (2, 'bar');
";

const SCHEMA_0_2_0: &str = "
INSERT INTO table_one VALUES (3, 'baz');
CREATE TABLE table_two (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL);
";

const SCHEMA_1_0_0: &str = "
INSERT INTO table_two VALUES (4, 'foofoo'), (5, 'foobar');
";

fn schema_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, sql) in files {
        std::fs::write(dir.path().join(name), sql).unwrap();
    }
    dir
}

fn full_schema_dir() -> TempDir {
    schema_dir(&[
        ("schema-current.sql", SCHEMA_CURRENT),
        ("schema-0.1.0.sql", SCHEMA_0_1_0),
        ("schema-0.2.0.sql", SCHEMA_0_2_0),
        ("schema-1.0.0.sql", SCHEMA_1_0_0),
    ])
}

fn duckdb_connection(dir: &Path) -> AdbiConnection {
    let driver = Arc::new(DuckDbDriver::in_memory().unwrap());
    let mut conn = AdbiConnection::connect(driver, None).unwrap();
    conn.set_schema_dir(dir).unwrap();
    conn
}

async fn table_rows(conn: &AdbiConnection, table: &str) -> Vec<(i64, String)> {
    let mut curs = conn.cursor().await.unwrap();
    curs.execute(&format!("SELECT id, name FROM {table} ORDER BY id"), None)
        .await
        .unwrap();
    curs.fetch_all()
        .await
        .unwrap()
        .into_iter()
        .map(|row| {
            (
                row.get(0).and_then(|v| v.as_i64()).unwrap(),
                row.get(1).and_then(|v| v.as_str()).unwrap().to_string(),
            )
        })
        .collect()
}

async fn assert_latest_schema(conn: &AdbiConnection) {
    assert_eq!(
        table_rows(conn, "table_one").await,
        vec![
            (1, "foo".to_string()),
            (2, "bar".to_string()),
            (3, "baz".to_string()),
        ]
    );
    assert_eq!(
        table_rows(conn, "table_two").await,
        vec![(4, "foofoo".to_string()), (5, "foobar".to_string())]
    );
}

async fn schema_table_exists(conn: &AdbiConnection) -> bool {
    let mut curs = conn.cursor().await.unwrap();
    curs.execute(
        "SELECT count(*) FROM information_schema.tables WHERE table_name = %s",
        Some(Params::positional(["_schema_info"])),
    )
    .await
    .unwrap();
    let row = curs.fetch_one().await.unwrap().unwrap();
    row.get(0).and_then(|v| v.as_i64()).unwrap() > 0
}

/// Deploys the 0.1.0 release, then points the connection at `dir`.
async fn install_0_1_0(conn: &mut AdbiConnection, dir: &Path) {
    let release = schema_dir(&[
        ("schema-current.sql", SCHEMA_0_1_0),
        ("schema-0.1.0.sql", SCHEMA_0_1_0),
    ]);
    conn.set_schema_dir(release.path()).unwrap();
    conn.update_schema().await.unwrap();
    assert_eq!(
        conn.current_schema_version().await.unwrap().as_deref(),
        Some("0.1.0")
    );
    conn.set_schema_dir(dir).unwrap();
}

#[tokio::test]
async fn test_current_schema_version_unversioned() {
    let dir = full_schema_dir();
    let conn = duckdb_connection(dir.path());
    assert_eq!(conn.current_schema_version().await.unwrap(), None);
    // Reading the version never creates the table.
    assert!(!schema_table_exists(&conn).await);
    assert_eq!(conn.current_schema_version().await.unwrap(), None);
}

#[tokio::test]
async fn test_clean_install() {
    let dir = full_schema_dir();
    let conn = duckdb_connection(dir.path());

    let path = conn.update_schema().await.unwrap();

    assert_eq!(path.paths(), vec![dir.path().join("schema-current.sql")]);
    assert_eq!(path.latest_version.as_deref(), Some("1.0.0"));
    assert_eq!(
        conn.current_schema_version().await.unwrap().as_deref(),
        Some("1.0.0")
    );
    assert_latest_schema(&conn).await;
}

#[tokio::test]
async fn test_rerun_is_noop() {
    let dir = full_schema_dir();
    let conn = duckdb_connection(dir.path());
    conn.update_schema().await.unwrap();

    let path = conn.update_schema().await.unwrap();

    assert!(path.is_empty());
    assert_eq!(
        conn.current_schema_version().await.unwrap().as_deref(),
        Some("1.0.0")
    );
    assert_latest_schema(&conn).await;
}

#[tokio::test]
async fn test_upgrade_converges_with_clean_install() {
    let dir = full_schema_dir();
    let mut conn = duckdb_connection(dir.path());
    install_0_1_0(&mut conn, dir.path()).await;

    let planned = conn.upgrade_path().await.unwrap();
    assert_eq!(
        planned.paths(),
        vec![
            dir.path().join("schema-0.2.0.sql"),
            dir.path().join("schema-1.0.0.sql"),
        ]
    );

    let applied = conn.update_schema().await.unwrap();
    assert_eq!(applied, planned);
    assert_eq!(
        conn.current_schema_version().await.unwrap().as_deref(),
        Some("1.0.0")
    );
    assert_latest_schema(&conn).await;
}

#[tokio::test]
async fn test_failed_script_leaves_version_untouched() {
    let dir = schema_dir(&[
        ("schema-current.sql", SCHEMA_CURRENT),
        ("schema-0.1.0.sql", SCHEMA_0_1_0),
        ("schema-0.2.0.sql", SCHEMA_0_2_0),
        ("schema-1.0.0.sql", "INSERT INTO no_such_table VALUES (1);"),
    ]);
    let mut conn = duckdb_connection(dir.path());
    install_0_1_0(&mut conn, dir.path()).await;

    let err = conn.update_schema().await.unwrap_err();
    assert!(matches!(err, AdbiError::QueryFailed(_)));

    // 0.2.0 stays applied, the marker still says 0.1.0.
    assert_eq!(
        conn.current_schema_version().await.unwrap().as_deref(),
        Some("0.1.0")
    );
    assert_eq!(table_rows(&conn, "table_one").await.len(), 3);
    assert!(table_rows(&conn, "table_two").await.is_empty());
}

#[tokio::test]
async fn test_missing_current_schema_aborts() {
    let dir = schema_dir(&[("schema-1.0.0.sql", SCHEMA_1_0_0)]);
    let conn = duckdb_connection(dir.path());

    let err = conn.update_schema().await.unwrap_err();
    assert!(matches!(err, AdbiError::MissingCurrentSchema { .. }));
    // Aborted before anything was written.
    assert!(!schema_table_exists(&conn).await);
    assert_eq!(conn.current_schema_version().await.unwrap(), None);
}

#[tokio::test]
async fn test_config_driven_connection() {
    let dir = schema_dir(&[
        ("db_current.sql", SCHEMA_CURRENT),
        ("db_1.0.0.sql", SCHEMA_1_0_0),
    ]);
    let config = AdbiConfig::from_toml_str(&format!(
        "schema_dir = {:?}\nschema_file_format = \"db_{{version}}.sql\"\n",
        dir.path().display().to_string()
    ))
    .unwrap();
    let driver = Arc::new(DuckDbDriver::in_memory().unwrap());
    let conn = AdbiConnection::with_config(driver, &config).unwrap();
    assert_eq!(conn.param_style(), ParamStyle::Qmark);
    assert_eq!(conn.schema_file_format(), "db_{version}.sql");

    conn.update_schema().await.unwrap();
    assert_latest_schema(&conn).await;
}

#[tokio::test]
async fn test_marker_statements_are_rewritten_for_driver() {
    let dir = schema_dir(&[
        ("schema-current.sql", SCHEMA_CURRENT),
        ("schema-1.0.0.sql", SCHEMA_1_0_0),
    ]);
    let in_memory_test_driver = Arc::new(InMemoryTestDriver::new(Some(ParamStyle::Named)));
    let driver: Arc<dyn DatabaseDriver> =
        Arc::clone(&in_memory_test_driver) as Arc<dyn DatabaseDriver>;
    let mut conn = AdbiConnection::connect(driver, None).unwrap();
    conn.set_schema_dir(dir.path()).unwrap();

    conn.update_schema().await.unwrap();

    in_memory_test_driver.assert_last_query(
        "INSERT INTO _schema_info (variable, value) VALUES (:var1, :var2)",
        &[Params::named([("var1", "schema_version"), ("var2", "1.0.0")])],
    );
    let scripts: Vec<_> = in_memory_test_driver
        .recorded_queries()
        .into_iter()
        .filter(|q| q.sql == SCHEMA_CURRENT)
        .collect();
    assert_eq!(scripts.len(), 1);
    // No native script support declared, so the script went through execute.
    assert_eq!(scripts[0].kind, QueryKind::Execute);
    assert_eq!(in_memory_test_driver.commit_count(), 1);
}

#[tokio::test]
async fn test_version_table_created_only_when_applying() {
    let dir = schema_dir(&[("schema-current.sql", SCHEMA_CURRENT)]);
    let in_memory_test_driver = Arc::new(
        InMemoryTestDriver::new(Some(ParamStyle::Qmark))
            .with_failing_statement("SELECT value FROM _schema_info"),
    );
    let driver: Arc<dyn DatabaseDriver> =
        Arc::clone(&in_memory_test_driver) as Arc<dyn DatabaseDriver>;
    let mut conn = AdbiConnection::connect(driver, None).unwrap();
    conn.set_schema_dir(dir.path()).unwrap();

    // An unreadable version table reads as unversioned, with no writes.
    assert_eq!(conn.current_schema_version().await.unwrap(), None);
    let creates_table = |q: &RecordedQuery| q.sql.starts_with("CREATE TABLE _schema_info");
    assert!(!in_memory_test_driver.recorded_queries().iter().any(creates_table));
    assert_eq!(in_memory_test_driver.commit_count(), 0);

    // Applying creates and commits the table before running scripts.
    let path = conn.update_schema().await.unwrap();
    assert_eq!(path.latest_version, None);
    let queries = in_memory_test_driver.recorded_queries();
    let create = queries.iter().position(creates_table).unwrap();
    let script = queries.iter().position(|q| q.sql == SCHEMA_CURRENT).unwrap();
    assert!(create < script);
    assert_eq!(in_memory_test_driver.commit_count(), 2);
}
