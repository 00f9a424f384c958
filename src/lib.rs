/*!
 * # translatable - locale-aware translation tables for persisted records
 *
 * Each primary record (e.g. a `Country`) owns one companion row per locale
 * in a translation table (`country_translations`), linked by a foreign key
 * (`country_id`) and a locale column (`locale`).
 *
 * ## Features
 *
 * - Naming conventions for translation models, tables and keys, with
 *   per-type overrides
 * - Explicit current-locale context and configurable fallback locale
 * - Lazy, once-per-locale loading of translation rows
 * - Attribute routing: translatable attributes read and write the current
 *   locale's row
 * - Saving an entity writes every new or changed translation with it
 * - Locale-keyed mass assignment honouring allow-lists
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration defaults and loading
 * - `database`: SQLite storage collaborator:
 *   - `database::connection`: Connection management
 *   - `database::schema`: Schema bookkeeping and table helpers
 *   - `database::models`: Rows with dirty tracking
 *   - `database::repository`: Row-level storage primitives
 * - `translation`: Translation resolution and persistence
 * - `errors`: Custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::TranslatableConfig;
pub use database::{DatabaseConnection, RecordStore, Repository};
pub use errors::{Result, TranslatableError};
pub use translation::{
    AllowList, EntityDescriptor, EntityType, LocaleContext, Lookup, TranslatableEntity,
    TranslationRecord,
};
