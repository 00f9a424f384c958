/*!
 * Saving an entity together with its translations.
 *
 * The primary row is written first because new translations need its
 * identity. Dirty translations follow; the first failing write aborts the
 * rest of the save and is returned to the caller.
 */

use log::{debug, info};
use serde_json::Value;

use crate::errors::{Result, TranslatableError};
use crate::translation::entity::TranslatableEntity;

impl TranslatableEntity {
    /// Persist the primary row, then every new or changed translation
    pub fn save(&mut self) -> Result<()> {
        let id = self.save_primary()?;
        let saved = self.save_translations(id)?;

        if saved > 0 {
            info!(
                "Saved {} #{} with {} translation(s)",
                self.kind.descriptor().name(),
                id,
                saved
            );
        }
        Ok(())
    }

    /// Insert or update the primary row and return its identity
    fn save_primary(&mut self) -> Result<i64> {
        let table = self.kind.naming().primary_table();
        let primary_key = self.kind.descriptor().primary_key().to_string();

        if self.kind.descriptor().timestamps() && self.record.is_dirty() {
            let now = Value::from(chrono::Utc::now().to_rfc3339());
            if !self.record.exists() {
                self.record.set("created_at", now.clone());
            }
            self.record.set("updated_at", now);
        }

        if !self.record.exists() {
            let mut attributes = self.record.attributes().clone();
            if attributes.get(&primary_key).is_some_and(Value::is_null) {
                attributes.remove(&primary_key);
            }

            let id = self.kind.store().insert(&table, &attributes)?;
            self.record.set(&primary_key, Value::from(id));
            self.record.sync_original();
            debug!("Inserted {} #{}", table, id);
            return Ok(id);
        }

        // The row is addressed by the key it was stored under, even if the
        // in-memory key has been changed since
        let stored_id = self
            .record
            .original(&primary_key)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                TranslatableError::persistence(&table, format!("stored row has no '{}' value", primary_key))
            })?;

        if self.record.is_dirty() {
            self.kind
                .store()
                .update(&table, &primary_key, stored_id, &self.record.dirty_attributes())?;
            self.record.sync_original();
            debug!("Updated {} #{}", table, stored_id);
        }

        self.id().ok_or_else(|| {
            TranslatableError::persistence(&table, format!("row has no '{}' value", primary_key))
        })
    }

    /// Write every dirty translation, linking it to `owner`
    fn save_translations(&mut self, owner: i64) -> Result<usize> {
        let table = self.translations.table().to_string();
        let relation_key = self.translations.relation_key().to_string();
        let primary_key = self.kind.descriptor().primary_key().to_string();
        let store = self.kind.store();

        let mut saved = 0;
        for translation in self.translations.dirty_records_mut() {
            let locale = translation.locale().to_string();
            let record = translation.record_mut();
            record.set(&relation_key, Value::from(owner));

            if record.exists() {
                let id = record.get_i64(&primary_key).ok_or_else(|| {
                    TranslatableError::persistence(
                        &table,
                        format!("{} translation has no '{}' value", locale, primary_key),
                    )
                })?;
                store.update(&table, &primary_key, id, &record.dirty_attributes())?;
            } else {
                let id = store.insert(&table, record.attributes())?;
                record.set(&primary_key, Value::from(id));
            }

            record.sync_original();
            debug!("Saved {} translation of {} #{}", locale, table, owner);
            saved += 1;
        }

        Ok(saved)
    }
}
