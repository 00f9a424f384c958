/*!
 * Repository layer for database operations.
 *
 * The translation layer only needs row-level primitives: insert, update by
 * key, find by key and "first row matching these columns". `RecordStore`
 * names that seam; `Repository` implements it on SQLite.
 */

use anyhow::Context;
use log::debug;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;

use super::connection::DatabaseConnection;
use super::models::{from_sql_value, to_sql_value, Attributes};
use crate::errors::{Result, TranslatableError};

/// Row-level storage primitives consumed by the translation layer
pub trait RecordStore {
    /// Insert a row and return its new integer key
    fn insert(&self, table: &str, attributes: &Attributes) -> Result<i64>;

    /// Update the given columns of the row whose `key_column` equals `id`
    fn update(&self, table: &str, key_column: &str, id: i64, attributes: &Attributes) -> Result<()>;

    /// Fetch the row whose `key_column` equals `id`
    fn find(&self, table: &str, key_column: &str, id: i64) -> Result<Option<Attributes>>;

    /// Fetch the first row matching every `(column, value)` pair
    fn first_where(&self, table: &str, conditions: &[(&str, Value)]) -> Result<Option<Attributes>>;
}

/// Check that a name is a plain SQL identifier
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate and double-quote an identifier for interpolation into SQL
pub fn quote_identifier(name: &str) -> Result<String> {
    if is_valid_identifier(name) {
        Ok(format!("\"{}\"", name))
    } else {
        Err(TranslatableError::InvalidIdentifier(name.to_string()))
    }
}

/// SQLite-backed record store
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// The underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Read the first row of a query into an attribute map
    fn query_first(conn: &Connection, sql: &str, values: Vec<rusqlite::types::Value>) -> anyhow::Result<Option<Attributes>> {
        let mut stmt = conn.prepare(sql).with_context(|| format!("Failed to prepare: {}", sql))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(values))?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut attributes = Attributes::new();
        for (index, column) in columns.into_iter().enumerate() {
            attributes.insert(column, from_sql_value(row.get_ref(index)?));
        }

        Ok(Some(attributes))
    }
}

impl RecordStore for Repository {
    fn insert(&self, table: &str, attributes: &Attributes) -> Result<i64> {
        let quoted_table = quote_identifier(table)?;
        let columns = attributes
            .keys()
            .map(|c| quote_identifier(c))
            .collect::<Result<Vec<_>>>()?;

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quoted_table)
        } else {
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quoted_table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        let values: Vec<_> = attributes.values().map(to_sql_value).collect();

        let id = self
            .db
            .execute(|conn| {
                conn.execute(&sql, params_from_iter(values))?;
                Ok(conn.last_insert_rowid())
            })
            .map_err(|e| TranslatableError::persistence(table, format!("{:#}", e)))?;

        debug!("Inserted row {} into {}", id, table);
        Ok(id)
    }

    fn update(&self, table: &str, key_column: &str, id: i64, attributes: &Attributes) -> Result<()> {
        if attributes.is_empty() {
            return Ok(());
        }

        let quoted_table = quote_identifier(table)?;
        let quoted_key = quote_identifier(key_column)?;
        let assignments = attributes
            .keys()
            .enumerate()
            .map(|(i, c)| Ok(format!("{} = ?{}", quote_identifier(c)?, i + 1)))
            .collect::<Result<Vec<_>>>()?;

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quoted_table,
            assignments.join(", "),
            quoted_key,
            attributes.len() + 1
        );
        let mut values: Vec<_> = attributes.values().map(to_sql_value).collect();
        values.push(rusqlite::types::Value::Integer(id));

        let changed = self
            .db
            .execute(|conn| Ok(conn.execute(&sql, params_from_iter(values))?))
            .map_err(|e| TranslatableError::persistence(table, format!("{:#}", e)))?;

        if changed == 0 {
            return Err(TranslatableError::persistence(
                table,
                format!("no row with {} = {}", key_column, id),
            ));
        }

        debug!("Updated row {} in {} ({} columns)", id, table, attributes.len());
        Ok(())
    }

    fn find(&self, table: &str, key_column: &str, id: i64) -> Result<Option<Attributes>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 LIMIT 1",
            quote_identifier(table)?,
            quote_identifier(key_column)?
        );

        let row = self
            .db
            .execute(|conn| Self::query_first(conn, &sql, vec![rusqlite::types::Value::Integer(id)]))?;
        Ok(row)
    }

    fn first_where(&self, table: &str, conditions: &[(&str, Value)]) -> Result<Option<Attributes>> {
        let mut sql = format!("SELECT * FROM {}", quote_identifier(table)?);
        if !conditions.is_empty() {
            let clauses = conditions
                .iter()
                .enumerate()
                .map(|(i, (column, _))| Ok(format!("{} = ?{}", quote_identifier(column)?, i + 1)))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" LIMIT 1");

        let values: Vec<_> = conditions.iter().map(|(_, v)| to_sql_value(v)).collect();
        let row = self.db.execute(|conn| Self::query_first(conn, &sql, values))?;
        Ok(row)
    }
}
