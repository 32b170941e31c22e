// file: src/database/mod.rs

use anyhow::{Context, Result};
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};

// Declare submodules
pub mod kv;
pub mod settings;

pub use kv::SqliteStore;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the SQLite database at `path` and applies
    /// the embedded schema.
    pub async fn new(path: &str) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", path);

        // Create database if it doesn't exist
        let db_exists = Sqlite::database_exists(&db_url)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating database at {}", path);
            Sqlite::create_database(&db_url)
                .await
                .context("Failed to create database")?;
        }

        let pool = SqlitePool::connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool).await.context("Failed to run database schema")?;

        info!("Database initialized successfully");

        Ok(Database { pool })
    }

    /// Wraps an already-open pool, applying the schema.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        run_schema(&pool).await.context("Failed to run database schema")?;
        Ok(Database { pool })
    }

    /// Key/value view over the same pool, used as the schedule cache store.
    pub fn kv_store(&self) -> SqliteStore {
        SqliteStore::new(self.pool.clone())
    }

    // --- Settings Delegates ---

    pub async fn get_settings(&self) -> Result<crate::models::Settings> {
        settings::get(&self.pool).await
    }

    pub async fn update_settings(&self, settings: &crate::models::Settings) -> Result<()> {
        settings::update(&self.pool, settings).await
    }
}

async fn run_schema(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();
    let mut in_trigger = false;

    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        if trimmed.to_uppercase().starts_with("CREATE TRIGGER") {
            in_trigger = true;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            if in_trigger {
                if trimmed.to_uppercase() == "END;" {
                    in_trigger = false;
                    sqlx::query(&current_statement).execute(pool).await?;
                    current_statement.clear();
                }
            } else {
                sqlx::query(&current_statement).execute(pool).await?;
                current_statement.clear();
            }
        }
    }
    Ok(())
}
