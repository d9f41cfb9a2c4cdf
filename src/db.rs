use anyhow::Result;
use sqlx::MySqlPool;

use crate::auth::password::hash_password;
use crate::model::role::Role;

const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Create both tables if they do not exist yet. Runs once at startup.
pub async fn bootstrap_schema(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(50) NOT NULL,
            created_at TIMESTAMP NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leave_applications (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            applicant_id BIGINT UNSIGNED NOT NULL,
            applicant_name VARCHAR(255) NOT NULL,
            applicant_role VARCHAR(50) NOT NULL,
            leave_type VARCHAR(50) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            reason TEXT NOT NULL,
            status VARCHAR(50) NOT NULL DEFAULT 'Pending',
            submitted_at TIMESTAMP NULL DEFAULT CURRENT_TIMESTAMP,
            approver_id BIGINT UNSIGNED NULL,
            approver_name VARCHAR(255) NULL,
            approved_at TIMESTAMP NULL,
            approver_remarks TEXT NULL,
            FOREIGN KEY (applicant_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Schema bootstrap complete");
    Ok(())
}

/// Insert the default admin account unless one is already present.
pub async fn seed_default_admin(pool: &MySqlPool) -> Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)")
            .bind(DEFAULT_ADMIN_EMAIL)
            .fetch_one(pool)
            .await?;

    if exists {
        return Ok(());
    }

    let hashed = hash_password("admin123");

    sqlx::query("INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)")
        .bind("Admin User")
        .bind(DEFAULT_ADMIN_EMAIL)
        .bind(hashed)
        .bind(Role::Admin.to_string())
        .execute(pool)
        .await?;

    tracing::info!(email = DEFAULT_ADMIN_EMAIL, "Default admin user created");
    Ok(())
}
