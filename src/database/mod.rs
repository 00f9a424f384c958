/*!
 * Database module: the storage collaborator of the translation layer.
 *
 * This module provides SQLite-based persistence for:
 * - Connection management and schema bookkeeping
 * - Row models with dirty tracking
 * - Row-level create/read/update primitives behind `RecordStore`
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{Attributes, Record};
pub use repository::{RecordStore, Repository};
