/*!
 * Per-entity translation cache.
 *
 * Maps locale to translation record for one primary entity instance. Rows
 * are pulled from storage lazily, at most once per locale, and misses are
 * remembered as well so a locale is never queried twice.
 */

use log::debug;
use serde_json::{Map, Value};
use std::collections::{btree_map::Entry, BTreeMap, HashSet};

use crate::database::models::{Attributes, Record};
use crate::database::repository::RecordStore;
use crate::errors::Result;
use crate::translation::descriptor::AllowList;
use crate::translation::naming::NamingResolver;

/// Outcome of a cache lookup
#[derive(Debug)]
pub enum Lookup<T> {
    /// Loaded from storage or already cached
    Found(T),
    /// Not stored anywhere; an empty unsaved record was cached
    CreatedEmpty(T),
    /// Not stored anywhere and creation was not requested
    Absent,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(t) | Self::CreatedEmpty(t) => Some(t),
            Self::Absent => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::CreatedEmpty(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Translation row for one locale of one primary entity
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRecord {
    locale: String,
    record: Record,
}

impl TranslationRecord {
    fn from_storage(locale: &str, attributes: Attributes) -> Self {
        Self {
            locale: locale.to_string(),
            record: Record::from_storage(attributes),
        }
    }

    fn placeholder(locale: &str, locale_key: &str, relation_key: &str, owner: Option<i64>) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(relation_key.to_string(), owner.map(Value::from).unwrap_or(Value::Null));
        attributes.insert(locale_key.to_string(), Value::from(locale));
        Self {
            locale: locale.to_string(),
            record: Record::pending(attributes),
        }
    }

    /// Locale this row holds values for
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.record.get_str(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.record.get_i64(key)
    }

    /// Set a value in memory; written on the owner's next save
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.record.set(key, value.into());
    }

    /// Mass-assign `input`, skipping keys the allow-list rejects or that are
    /// `protected`. Returns how many keys were applied.
    pub fn fill(&mut self, input: &Map<String, Value>, allowed: &AllowList, protected: &[&str]) -> usize {
        let mut applied = 0;
        for (key, value) in input {
            if protected.contains(&key.as_str()) || !allowed.allows(key) {
                debug!("Skipping non-fillable translation attribute '{}' ({})", key, self.locale);
                continue;
            }
            self.record.set(key, value.clone());
            applied += 1;
        }
        applied
    }

    pub fn attributes(&self) -> &Attributes {
        self.record.attributes()
    }

    pub fn exists(&self) -> bool {
        self.record.exists()
    }

    /// Whether saving would write this row. A new row that only carries its
    /// foreign key and locale is not written.
    pub fn is_dirty(&self) -> bool {
        if self.record.exists() {
            self.record.is_dirty()
        } else {
            self.record.has_changes()
        }
    }

    pub(crate) fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}

/// Locale to translation record map owned by one primary entity
#[derive(Debug, Clone)]
pub struct TranslationCache {
    table: String,
    relation_key: String,
    locale_key: String,
    records: BTreeMap<String, TranslationRecord>,
    /// Locales already looked up in storage without a match
    missing: HashSet<String>,
}

impl TranslationCache {
    pub fn new(naming: &NamingResolver<'_>) -> Self {
        Self {
            table: naming.translation_table(),
            relation_key: naming.relation_key(),
            locale_key: naming.locale_key(),
            records: BTreeMap::new(),
            missing: HashSet::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn relation_key(&self) -> &str {
        &self.relation_key
    }

    pub fn locale_key(&self) -> &str {
        &self.locale_key
    }

    /// Make sure `locale` has been looked up; true if a record is cached
    fn load(&mut self, store: &dyn RecordStore, owner: Option<i64>, locale: &str) -> Result<bool> {
        if self.records.contains_key(locale) {
            debug!("Translation cache hit for {} ({})", self.table, locale);
            return Ok(true);
        }
        if self.missing.contains(locale) {
            return Ok(false);
        }

        // An entity without identity cannot have stored translations
        let Some(owner) = owner else {
            self.missing.insert(locale.to_string());
            return Ok(false);
        };

        let row = store.first_where(
            &self.table,
            &[
                (self.relation_key.as_str(), Value::from(owner)),
                (self.locale_key.as_str(), Value::from(locale)),
            ],
        )?;

        match row {
            Some(attributes) => {
                debug!("Loaded {} translation for {} #{}", locale, self.table, owner);
                self.records
                    .insert(locale.to_string(), TranslationRecord::from_storage(locale, attributes));
                Ok(true)
            }
            None => {
                debug!("No {} translation stored for {} #{}", locale, self.table, owner);
                self.missing.insert(locale.to_string());
                Ok(false)
            }
        }
    }

    /// Look up `locale`, inserting an empty placeholder when `create` is set
    pub fn lookup(
        &mut self,
        store: &dyn RecordStore,
        owner: Option<i64>,
        locale: &str,
        create: bool,
    ) -> Result<Lookup<&mut TranslationRecord>> {
        self.load(store, owner, locale)?;

        match self.records.entry(locale.to_string()) {
            Entry::Occupied(entry) => Ok(Lookup::Found(entry.into_mut())),
            Entry::Vacant(entry) => {
                if !create {
                    return Ok(Lookup::Absent);
                }
                debug!("Creating empty {} translation in {}", locale, self.table);
                self.missing.remove(locale);
                let record = TranslationRecord::placeholder(
                    locale,
                    &self.locale_key,
                    &self.relation_key,
                    owner,
                );
                Ok(Lookup::CreatedEmpty(entry.insert(record)))
            }
        }
    }

    /// The record for `locale`, created empty if nothing is stored
    pub fn get_or_create(
        &mut self,
        store: &dyn RecordStore,
        owner: Option<i64>,
        locale: &str,
    ) -> Result<&mut TranslationRecord> {
        if !self.load(store, owner, locale)? {
            debug!("Creating empty {} translation in {}", locale, self.table);
            self.missing.remove(locale);
        }

        let (locale_key, relation_key) = (&self.locale_key, &self.relation_key);
        Ok(self
            .records
            .entry(locale.to_string())
            .or_insert_with(|| TranslationRecord::placeholder(locale, locale_key, relation_key, owner)))
    }

    /// The record for `locale`, else the record for `fallback` (one hop only)
    pub fn get(
        &mut self,
        store: &dyn RecordStore,
        owner: Option<i64>,
        locale: &str,
        fallback: Option<&str>,
    ) -> Result<Option<&TranslationRecord>> {
        if self.load(store, owner, locale)? {
            return Ok(self.records.get(locale));
        }

        match fallback.filter(|f| *f != locale) {
            Some(fallback) => {
                debug!("Falling back from {} to {} in {}", locale, fallback, self.table);
                self.load(store, owner, fallback)?;
                Ok(self.records.get(fallback))
            }
            None => Ok(None),
        }
    }

    /// Whether a record for `locale` is cached or stored
    pub fn has(&mut self, store: &dyn RecordStore, owner: Option<i64>, locale: &str) -> Result<bool> {
        self.load(store, owner, locale)
    }

    /// Records that are new or changed since they were loaded
    pub fn dirty_records_mut(&mut self) -> impl Iterator<Item = &mut TranslationRecord> {
        self.records.values_mut().filter(|r| r.is_dirty())
    }

    pub fn has_dirty(&self) -> bool {
        self.records.values().any(TranslationRecord::is_dirty)
    }

    /// Locales currently held in memory
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
