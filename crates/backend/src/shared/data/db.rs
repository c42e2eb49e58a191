use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::config;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Initialize the SQLite connection and bootstrap the schema.
/// The database path comes from config.toml (see shared::config).
pub async fn initialize_database() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    let db_file = config::get_database_path(&cfg)?;

    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = db_file.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    // Ensure required tables exist (minimal schema bootstrap)
    let check_cake_table = r#"
        SELECT name FROM sqlite_master WHERE type='table' AND name='a001_cake';
    "#;
    let cake_table_exists = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            check_cake_table.to_string(),
        ))
        .await?;

    if cake_table_exists.is_empty() {
        tracing::info!("Creating a001_cake table");
        // NB: на sku сознательно нет UNIQUE-ограничения — уникальность
        // проверяется на уровне приложения (см. DESIGN.md)
        let create_cake_table_sql = r#"
            CREATE TABLE a001_cake (
                id TEXT PRIMARY KEY NOT NULL,
                sku TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                cake_type TEXT NOT NULL DEFAULT 'Vegetarian',
                image_url TEXT,
                price REAL NOT NULL,
                weight REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'Available',
                created_at TEXT NOT NULL,
                expiry_at TEXT NOT NULL,
                customer_name TEXT,
                customer_phone TEXT,
                sold_at TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_cake_table_sql.to_string(),
        ))
        .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
