/*!
 * Common test utilities for the translatable test suite
 */

use anyhow::Result;
use serde_json::Value;
use std::cell::RefCell;
use std::sync::Arc;

use translatable::database::models::Attributes;
use translatable::database::schema::create_entity_tables;
use translatable::{
    AllowList, EntityDescriptor, EntityType, RecordStore, Repository, TranslatableConfig,
    TranslatableError,
};

/// Install a test logger once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The plain Country model: `iso` plus a translatable `name`
pub fn country_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("Country")
        .translated(&["name"])
        .fillable(AllowList::only(&["iso", "name"]))
        .translation_fillable(AllowList::only(&["name"]))
}

/// Country over the same tables whose translation model allows nothing
pub fn country_strict_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("CountryStrict")
        .with_table("countries")
        .with_translation_table("country_translations")
        .with_translation_foreign_key("country_id")
        .translated(&["name"])
        .fillable(AllowList::only(&["iso", "name"]))
        .translation_fillable(AllowList::none())
}

/// Create the country tables on a fresh in-memory database
pub fn create_repository(config: &TranslatableConfig) -> Result<Repository> {
    init_logging();
    let repo = Repository::new_in_memory()?;
    let descriptor = country_descriptor();
    repo.connection().execute(|conn| {
        create_entity_tables(conn, &descriptor, config, &[("iso", "TEXT NOT NULL")])
    })?;
    Ok(repo)
}

/// Seed Greece (#1: el, en, de) and France (#2: en)
pub fn seed_countries(repo: &Repository) -> Result<()> {
    repo.connection().execute(|conn| {
        conn.execute_batch(
            r#"
            INSERT INTO countries (id, iso) VALUES (1, 'gr');
            INSERT INTO countries (id, iso) VALUES (2, 'fr');
            INSERT INTO country_translations (country_id, locale, name) VALUES (1, 'el', 'Ελλάδα');
            INSERT INTO country_translations (country_id, locale, name) VALUES (1, 'en', 'Greece');
            INSERT INTO country_translations (country_id, locale, name) VALUES (1, 'de', 'Griechenland');
            INSERT INTO country_translations (country_id, locale, name) VALUES (2, 'en', 'France');
            "#,
        )?;
        Ok(())
    })
}

/// Seeded database plus the Country entity type bound to it
pub fn seeded_countries(config: TranslatableConfig) -> Result<(EntityType, Repository)> {
    let repo = create_repository(&config)?;
    seed_countries(&repo)?;
    let countries = EntityType::new(country_descriptor(), Arc::new(config), Arc::new(repo.clone()));
    Ok((countries, repo))
}

/// Read one column of the first matching row straight from storage
pub fn stored_value(repo: &Repository, table: &str, conditions: &[(&str, Value)], column: &str) -> Result<Option<Value>> {
    let row = repo.first_where(table, conditions)?;
    Ok(row.and_then(|r| r.get(column).cloned()))
}

/// Store double that records every write and can fail writes to one table
pub struct RecordingStore {
    inner: Repository,
    fail_table: Option<String>,
    pub writes: RefCell<Vec<String>>,
    pub reads: RefCell<usize>,
}

impl RecordingStore {
    pub fn new(inner: Repository) -> Self {
        Self {
            inner,
            fail_table: None,
            writes: RefCell::new(Vec::new()),
            reads: RefCell::new(0),
        }
    }

    /// Reject every insert and update into `table`
    pub fn failing_on(inner: Repository, table: &str) -> Self {
        Self {
            fail_table: Some(table.to_string()),
            ..Self::new(inner)
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    fn record_write(&self, op: &str, table: &str) -> translatable::Result<()> {
        self.writes.borrow_mut().push(format!("{} {}", op, table));
        if self.fail_table.as_deref() == Some(table) {
            return Err(TranslatableError::persistence(table, "simulated write failure"));
        }
        Ok(())
    }
}

impl RecordStore for RecordingStore {
    fn insert(&self, table: &str, attributes: &Attributes) -> translatable::Result<i64> {
        self.record_write("insert", table)?;
        self.inner.insert(table, attributes)
    }

    fn update(&self, table: &str, key_column: &str, id: i64, attributes: &Attributes) -> translatable::Result<()> {
        self.record_write("update", table)?;
        self.inner.update(table, key_column, id, attributes)
    }

    fn find(&self, table: &str, key_column: &str, id: i64) -> translatable::Result<Option<Attributes>> {
        *self.reads.borrow_mut() += 1;
        self.inner.find(table, key_column, id)
    }

    fn first_where(&self, table: &str, conditions: &[(&str, Value)]) -> translatable::Result<Option<Attributes>> {
        *self.reads.borrow_mut() += 1;
        self.inner.first_where(table, conditions)
    }
}
