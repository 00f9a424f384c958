/*!
 * Mass assignment routing.
 *
 * Object-valued keys are locale sub-maps and fill that locale's translation;
 * everything else is primary mass assignment. Both sides honour their
 * allow-lists and drop what they do not allow without failing.
 */

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::errors::Result;
use crate::translation::entity::TranslatableEntity;
use crate::translation::locale::LocaleContext;

impl TranslatableEntity {
    /// Apply a keyed input object to this entity
    pub fn fill(&mut self, ctx: &LocaleContext, input: &Value) -> Result<()> {
        let Some(input) = input.as_object() else {
            warn!("Ignoring mass assignment with non-object input");
            return Ok(());
        };

        for (key, value) in input {
            if let Some(sub_map) = value.as_object() {
                if self.kind.config().accepts_locale(key) {
                    self.fill_translation(key, sub_map)?;
                    continue;
                }
            }

            if self.is_fillable(key) {
                self.set_attribute(ctx, key, value.clone())?;
            } else {
                debug!(
                    "Dropping non-fillable attribute '{}' for {}",
                    key,
                    self.kind.descriptor().name()
                );
            }
        }

        Ok(())
    }

    /// Whether `key` may be mass-assigned on the primary entity
    pub fn is_fillable(&self, key: &str) -> bool {
        key != self.kind.descriptor().primary_key() && self.kind.descriptor().fillable_list().allows(key)
    }

    fn fill_translation(&mut self, locale: &str, input: &Map<String, Value>) -> Result<usize> {
        let relation_key = self.relation_key();
        let locale_key = self.locale_key();
        let primary_key = self.kind.descriptor().primary_key().to_string();
        let protected = [relation_key.as_str(), locale_key.as_str(), primary_key.as_str()];

        let owner = self.id();
        let record = self
            .translations
            .get_or_create(self.kind.store(), owner, locale)?;

        let applied = record.fill(
            input,
            self.kind.descriptor().translation_fillable_list(),
            &protected,
        );
        debug!("Filled {} of {} attribute(s) for locale {}", applied, input.len(), locale);
        Ok(applied)
    }
}
