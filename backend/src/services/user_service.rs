use crate::services::database::get_db_connection;
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use sqlx::Connection;
use tokio::task::spawn_blocking;

/// Stores a new user with a salted password hash. Usernames are not checked
/// for uniqueness here.
pub async fn create_user(database_url: &str, username: &str, password: &str) -> Result<()> {
    let owned = password.to_string();
    let password_hash = spawn_blocking(move || hash_password(&owned))
        .await
        .context("Password hashing task failed")??;
    let mut conn = get_db_connection(database_url).await?;

    sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(&mut conn)
        .await
        .context("Failed to insert user")?;

    conn.close().await?;
    Ok(())
}

/// True when any stored credential for `username` matches `password`.
/// Key derivation runs on the blocking pool and stops at the first match.
pub async fn verify_user(database_url: &str, username: &str, password: &str) -> Result<bool> {
    let mut conn = get_db_connection(database_url).await?;

    let hashes: Vec<String> = sqlx::query_scalar("SELECT password FROM users WHERE username = ?")
        .bind(username)
        .fetch_all(&mut conn)
        .await
        .context("Failed to look up user")?;

    conn.close().await?;
    if hashes.is_empty() {
        return Ok(false);
    }

    let password = password.to_string();
    spawn_blocking(move || hashes.iter().any(|stored| verify_password(&password, stored)))
        .await
        .context("Password verification task failed")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::database::ensure_schema;
    use tempfile::TempDir;

    pub(crate) async fn temp_database() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("users.db").display());
        ensure_schema(&url).await.unwrap();
        (dir, url)
    }

    pub(crate) async fn user_count(database_url: &str) -> i64 {
        let mut conn = get_db_connection(database_url).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();
        count
    }

    #[rocket::async_test]
    async fn register_then_login() {
        let (_dir, url) = temp_database().await;

        create_user(&url, "alice", "wonderland").await.unwrap();

        assert!(verify_user(&url, "alice", "wonderland").await.unwrap());
        assert!(!verify_user(&url, "alice", "looking-glass").await.unwrap());
        assert!(!verify_user(&url, "Alice", "wonderland").await.unwrap());
        assert!(!verify_user(&url, "bob", "wonderland").await.unwrap());
    }

    #[rocket::async_test]
    async fn stores_hash_instead_of_password() {
        let (_dir, url) = temp_database().await;
        create_user(&url, "alice", "wonderland").await.unwrap();

        let mut conn = get_db_connection(&url).await.unwrap();
        let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = 'alice'")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        assert_ne!(stored, "wonderland");
        assert!(stored.starts_with("pbkdf2-sha256$"));
    }

    #[rocket::async_test]
    async fn duplicate_usernames_are_allowed() {
        let (_dir, url) = temp_database().await;
        create_user(&url, "alice", "first").await.unwrap();
        create_user(&url, "alice", "second").await.unwrap();

        assert_eq!(user_count(&url).await, 2);
        assert!(verify_user(&url, "alice", "first").await.unwrap());
        assert!(verify_user(&url, "alice", "second").await.unwrap());
    }

    #[rocket::async_test]
    async fn shared_username_matches_any_of_its_rows() {
        let (_dir, url) = temp_database().await;
        for n in 0..5 {
            create_user(&url, "shared", &format!("pw-{n}")).await.unwrap();
        }

        assert!(verify_user(&url, "shared", "pw-4").await.unwrap());
        assert!(verify_user(&url, "shared", "pw-0").await.unwrap());
        assert!(!verify_user(&url, "shared", "pw-5").await.unwrap());
    }

    #[rocket::async_test]
    async fn missing_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("empty.db").display());

        assert!(verify_user(&url, "alice", "pw").await.is_err());
    }
}
