/*!
 * Database schema bookkeeping and table helpers.
 *
 * Application tables belong to the caller. This module tracks the schema
 * version of the bookkeeping table and can create the primary/translation
 * table pair for an entity descriptor.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

use crate::app_config::TranslatableConfig;
use crate::database::repository::quote_identifier;
use crate::translation::descriptor::EntityDescriptor;
use crate::translation::naming::NamingResolver;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Foreign keys are a per-connection setting
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                version INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Database schema v{} is newer than supported v{}",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create the primary table and its translation table for an entity type.
///
/// `primary_columns` are `(name, sql type)` pairs besides the primary key.
/// Translatable attributes become nullable TEXT columns of the translation
/// table, which carries `UNIQUE(foreign key, locale)`.
pub fn create_entity_tables(
    conn: &Connection,
    descriptor: &EntityDescriptor,
    config: &TranslatableConfig,
    primary_columns: &[(&str, &str)],
) -> Result<()> {
    let naming = NamingResolver::new(descriptor, config);
    let primary_table = quote_identifier(&naming.primary_table())?;
    let translation_table = quote_identifier(&naming.translation_table())?;
    let primary_key = quote_identifier(descriptor.primary_key())?;
    let relation_key = quote_identifier(&naming.relation_key())?;
    let locale_key = quote_identifier(&naming.locale_key())?;

    let mut columns = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", primary_key)];
    for (name, sql_type) in primary_columns {
        columns.push(format!("{} {}", quote_identifier(name)?, sql_type));
    }
    if descriptor.timestamps() {
        columns.push("\"created_at\" TEXT".to_string());
        columns.push("\"updated_at\" TEXT".to_string());
    }

    let mut translation_columns = vec![
        format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", primary_key),
        format!(
            "{} INTEGER NOT NULL REFERENCES {}({}) ON DELETE CASCADE",
            relation_key, primary_table, primary_key
        ),
        format!("{} TEXT NOT NULL", locale_key),
    ];
    for attribute in descriptor.translated_attributes() {
        translation_columns.push(format!("{} TEXT", quote_identifier(attribute)?));
    }
    translation_columns.push(format!("UNIQUE({}, {})", relation_key, locale_key));

    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);\nCREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        primary_table,
        columns.join(",\n    "),
        translation_table,
        translation_columns.join(",\n    ")
    ))
    .with_context(|| format!("Failed to create tables for {}", descriptor.name()))?;

    info!(
        "Created tables {} and {} for {}",
        naming.primary_table(),
        naming.translation_table(),
        descriptor.name()
    );
    Ok(())
}
