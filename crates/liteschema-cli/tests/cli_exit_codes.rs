use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result};
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use tempfile::TempDir;

async fn fixture_db(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("cli.sqlite3");
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .context("creating fixture database")?;
    for sql in [
        "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
        "CREATE INDEX t_name_idx ON t(name)",
        "CREATE VIEW v AS SELECT name FROM t",
    ] {
        sqlx::query(sql).execute(&mut conn).await?;
    }
    conn.close().await?;
    Ok(path)
}

fn liteschema(db: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_liteschema"))
        .arg(db)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .context("running liteschema")
}

#[tokio::test]
async fn prints_markdown_by_default() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fixture_db(&dir).await?;

    let output = liteschema(&db, &["--quiet"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("# t\n"));
    assert!(stdout.contains("| Field |"));
    assert!(!stdout.contains("# v"));
    Ok(())
}

#[tokio::test]
async fn prints_one_table_as_text() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fixture_db(&dir).await?;

    let output = liteschema(&db, &["--table", "t", "--format", "text", "--quiet"])?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "t (id INTEGER PRIMARY KEY, name TEXT NOT NULL)\n"
    );
    Ok(())
}

#[tokio::test]
async fn missing_table_exits_with_enoent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fixture_db(&dir).await?;

    let output = liteschema(&db, &["--table", "missing"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("'missing' not found in the database"));
    Ok(())
}

#[tokio::test]
async fn missing_database_exits_with_failure() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = liteschema(&dir.path().join("absent.sqlite3"), &["--quiet"])?;
    assert_eq!(output.status.code(), Some(1));
    Ok(())
}

#[tokio::test]
async fn catalog_flag_prints_raw_entries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fixture_db(&dir).await?;

    let output = liteschema(&db, &["--catalog", "--quiet"])?;
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = entries
        .as_array()
        .context("catalog is a JSON array")?
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, vec!["t", "sqlite_sequence", "t_name_idx", "v"]);
    Ok(())
}

#[tokio::test]
async fn config_file_supplies_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db = fixture_db(&dir).await?;
    let config = dir.path().join("liteschema.toml");
    std::fs::write(&config, "format = \"json\"\ninclude_views = true\nlog_level = \"quiet\"\n")?;
    let log_file = dir.path().join("run.log");

    let config_arg = config.to_string_lossy().into_owned();
    let log_arg = log_file.to_string_lossy().into_owned();
    let output = liteschema(&db, &["--config", &config_arg, "--log-file", &log_arg])?;
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(schema["t"][0]["Key"], "PRI");
    assert_eq!(schema["v"], serde_json::json!([]));
    Ok(())
}
