use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;

/// Opens a fresh connection. Callers close it before returning.
pub async fn get_db_connection(database_url: &str) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true);

    options
        .connect()
        .await
        .context("Failed to connect to the user database")
}

pub async fn ensure_schema(database_url: &str) -> Result<()> {
    let mut conn = get_db_connection(database_url).await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password TEXT NOT NULL
        )",
    )
    .execute(&mut conn)
    .await
    .context("Failed to create users table")?;

    conn.close().await?;
    info!("User table ready.");
    Ok(())
}
