/*!
 * Translatable primary entities.
 *
 * `EntityType` bundles a descriptor with the configuration and store it is
 * used with, and acts as the finder/factory for instances. A
 * `TranslatableEntity` holds one primary row plus its translation cache and
 * routes attribute access: translatable attributes go to the translation of
 * the resolved locale, everything else to the primary row.
 *
 * Reads never create translation rows. Only write-intent access
 * (`set_attribute`, `translate_mut`, locale-keyed `fill`) does.
 */

use log::debug;
use serde_json::Value;
use std::sync::Arc;

use crate::app_config::TranslatableConfig;
use crate::database::models::{Attributes, Record};
use crate::database::repository::RecordStore;
use crate::errors::Result;
use crate::translation::cache::{Lookup, TranslationCache, TranslationRecord};
use crate::translation::descriptor::EntityDescriptor;
use crate::translation::locale::{self, LocaleContext};
use crate::translation::naming::NamingResolver;

/// An entity type bound to its configuration and storage
#[derive(Clone)]
pub struct EntityType {
    descriptor: Arc<EntityDescriptor>,
    config: Arc<TranslatableConfig>,
    store: Arc<dyn RecordStore>,
}

impl EntityType {
    pub fn new(
        descriptor: EntityDescriptor,
        config: Arc<TranslatableConfig>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            config,
            store,
        }
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &TranslatableConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn naming(&self) -> NamingResolver<'_> {
        NamingResolver::new(&self.descriptor, &self.config)
    }

    /// A fresh, unsaved instance
    pub fn new_entity(&self) -> TranslatableEntity {
        TranslatableEntity::with_record(self.clone(), Record::new())
    }

    /// Load an instance by primary key
    pub fn find(&self, id: i64) -> Result<Option<TranslatableEntity>> {
        let table = self.naming().primary_table();
        let row = self.store.find(&table, self.descriptor.primary_key(), id)?;
        Ok(row.map(|attributes| self.from_storage(attributes)))
    }

    /// Load the first instance whose `column` equals `value`
    pub fn first_where(&self, column: &str, value: impl Into<Value>) -> Result<Option<TranslatableEntity>> {
        let table = self.naming().primary_table();
        let row = self.store.first_where(&table, &[(column, value.into())])?;
        Ok(row.map(|attributes| self.from_storage(attributes)))
    }

    /// Mass-assign `input` to a new instance and save it
    pub fn create(&self, ctx: &LocaleContext, input: &Value) -> Result<TranslatableEntity> {
        let mut entity = self.new_entity();
        entity.fill(ctx, input)?;
        entity.save()?;
        Ok(entity)
    }

    fn from_storage(&self, attributes: Attributes) -> TranslatableEntity {
        TranslatableEntity::with_record(self.clone(), Record::from_storage(attributes))
    }
}

/// One primary row and its per-locale translations
pub struct TranslatableEntity {
    pub(crate) kind: EntityType,
    pub(crate) record: Record,
    pub(crate) translations: TranslationCache,
    use_translation_fallback: Option<bool>,
}

impl TranslatableEntity {
    fn with_record(kind: EntityType, record: Record) -> Self {
        let translations = TranslationCache::new(&kind.naming());
        Self {
            kind,
            record,
            translations,
            use_translation_fallback: None,
        }
    }

    /// The entity's type handle
    pub fn entity_type(&self) -> &EntityType {
        &self.kind
    }

    /// Primary key, once the row has been stored
    pub fn id(&self) -> Option<i64> {
        self.record.get_i64(self.kind.descriptor.primary_key())
    }

    pub fn exists(&self) -> bool {
        self.record.exists()
    }

    /// Whether the primary row or any cached translation needs saving
    pub fn is_dirty(&self) -> bool {
        self.record.is_dirty() || self.translations.has_dirty()
    }

    /// Columns of the primary row
    pub fn attributes(&self) -> &Attributes {
        self.record.attributes()
    }

    pub fn locale_key(&self) -> String {
        self.kind.naming().locale_key()
    }

    pub fn relation_key(&self) -> String {
        self.kind.naming().relation_key()
    }

    pub fn translation_model_name(&self) -> String {
        self.kind.naming().translation_model_name()
    }

    pub fn translation_model_name_default(&self) -> String {
        self.kind.naming().translation_model_name_default()
    }

    /// Decide fallback for this instance; `None` defers to the type and config
    pub fn set_use_translation_fallback(&mut self, enabled: Option<bool>) {
        self.use_translation_fallback = enabled;
    }

    pub fn use_translation_fallback(&self) -> Option<bool> {
        self.use_translation_fallback
            .or(self.kind.descriptor.use_translation_fallback())
    }

    pub fn is_translation_attribute(&self, key: &str) -> bool {
        self.kind.descriptor.is_translated(key)
    }

    fn fallback_for(&self, per_call: Option<bool>) -> Option<String> {
        locale::fallback_locale(&self.kind.config, self.use_translation_fallback(), per_call)
            .map(str::to_string)
    }

    /// Read an attribute; translatable ones come from the current locale
    pub fn attribute(&mut self, ctx: &LocaleContext, key: &str) -> Result<Option<Value>> {
        if !self.is_translation_attribute(key) {
            return Ok(self.record.get(key).cloned());
        }

        let found = self.get_translation(ctx, None, None)?;
        Ok(found.and_then(|t| t.get(key).cloned()))
    }

    /// Write an attribute; translatable ones go to the current locale's row
    pub fn set_attribute(&mut self, ctx: &LocaleContext, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if self.is_translation_attribute(key) {
            self.translate_mut(ctx, None)?.set(key, value);
        } else {
            self.record.set(key, value);
        }
        Ok(())
    }

    /// Read-intent access to a translation
    pub fn translate(
        &mut self,
        ctx: &LocaleContext,
        locale: Option<&str>,
        with_fallback: bool,
    ) -> Result<Option<&TranslationRecord>> {
        self.get_translation(ctx, locale, Some(with_fallback))
    }

    /// Write-intent access: the locale's row, created empty if missing
    pub fn translate_mut(&mut self, ctx: &LocaleContext, locale: Option<&str>) -> Result<&mut TranslationRecord> {
        let locale = locale::resolve(ctx, locale);
        let owner = self.id();
        self.translations
            .get_or_create(self.kind.store.as_ref(), owner, locale)
    }

    /// The locale's translation or the fallback one; never creates
    pub fn translate_or_default(
        &mut self,
        ctx: &LocaleContext,
        locale: Option<&str>,
    ) -> Result<Option<&TranslationRecord>> {
        self.get_translation(ctx, locale, Some(true))
    }

    /// Cache lookup; `with_fallback` overrides the instance setting for this call
    pub fn get_translation(
        &mut self,
        ctx: &LocaleContext,
        locale: Option<&str>,
        with_fallback: Option<bool>,
    ) -> Result<Option<&TranslationRecord>> {
        let locale = locale::resolve(ctx, locale);
        let fallback = self.fallback_for(with_fallback);
        let owner = self.id();
        self.translations
            .get(self.kind.store.as_ref(), owner, locale, fallback.as_deref())
    }

    /// Tagged lookup, optionally creating an empty row
    pub fn lookup_translation(
        &mut self,
        ctx: &LocaleContext,
        locale: Option<&str>,
        create: bool,
    ) -> Result<Lookup<&mut TranslationRecord>> {
        let locale = locale::resolve(ctx, locale);
        let owner = self.id();
        self.translations
            .lookup(self.kind.store.as_ref(), owner, locale, create)
    }

    pub fn has_translation(&mut self, ctx: &LocaleContext, locale: Option<&str>) -> Result<bool> {
        let locale = locale::resolve(ctx, locale);
        let owner = self.id();
        self.translations.has(self.kind.store.as_ref(), owner, locale)
    }

    /// Locales whose translations are currently loaded or pending
    pub fn cached_locales(&self) -> Vec<String> {
        self.translations.locales().map(str::to_string).collect()
    }

    /// Primary columns merged with the current locale's translated values
    pub fn to_map(&mut self, ctx: &LocaleContext) -> Result<Attributes> {
        let mut map = self.record.attributes().clone();
        let translated = self.kind.descriptor.translated_attributes().to_vec();

        if let Some(translation) = self.get_translation(ctx, None, None)? {
            debug!("Merging {} translation into attribute map", translation.locale());
            for attribute in translated {
                if let Some(value) = translation.get(&attribute) {
                    map.insert(attribute, value.clone());
                }
            }
        }

        Ok(map)
    }
}

impl std::fmt::Debug for TranslatableEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatableEntity")
            .field("type", &self.kind.descriptor.name())
            .field("attributes", self.record.attributes())
            .field("translations", &self.cached_locales())
            .finish()
    }
}
