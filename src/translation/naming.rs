/*!
 * Identifier resolution for translation models.
 *
 * Derives the translation model name, its table, the foreign key back to the
 * primary table and the locale column. Per-type overrides on the descriptor
 * win over the configuration, which wins over the built-in defaults.
 */

use crate::app_config::TranslatableConfig;
use crate::translation::descriptor::EntityDescriptor;

/// Resolves translation identifiers for one entity type
#[derive(Debug, Clone, Copy)]
pub struct NamingResolver<'a> {
    descriptor: &'a EntityDescriptor,
    config: &'a TranslatableConfig,
}

impl<'a> NamingResolver<'a> {
    pub fn new(descriptor: &'a EntityDescriptor, config: &'a TranslatableConfig) -> Self {
        Self { descriptor, config }
    }

    /// `<PrimaryName><Suffix>`, ignoring any per-type override
    pub fn translation_model_name_default(&self) -> String {
        format!("{}{}", self.descriptor.name(), self.config.translation_suffix)
    }

    /// The translation model name, honouring the per-type override
    pub fn translation_model_name(&self) -> String {
        match self.descriptor.translation_model_override() {
            Some(model) => model.to_string(),
            None => self.translation_model_name_default(),
        }
    }

    /// Foreign key column of the translation table
    pub fn relation_key(&self) -> String {
        match self.descriptor.translation_foreign_key_override() {
            Some(key) => key.to_string(),
            None => format!("{}_id", snake_case(self.descriptor.name())),
        }
    }

    /// Locale column of the translation table
    pub fn locale_key(&self) -> String {
        self.descriptor
            .locale_key_override()
            .unwrap_or(&self.config.translatable_locale_key)
            .to_string()
    }

    /// Table of the primary entity
    pub fn primary_table(&self) -> String {
        match self.descriptor.table_override() {
            Some(table) => table.to_string(),
            None => pluralize(&snake_case(self.descriptor.name())),
        }
    }

    /// Table holding the translation rows.
    ///
    /// Derived by pluralizing the snake_case model name, which only knows
    /// regular English endings: a suffix such as `Trans` yields
    /// `country_transes`. Name the table with `with_translation_table` when
    /// the derived plural is not the table's real name.
    pub fn translation_table(&self) -> String {
        match self.descriptor.translation_table_override() {
            Some(table) => table.to_string(),
            None => pluralize(&snake_case(&self.translation_model_name())),
        }
    }
}

/// `CountryTranslation` -> `country_translation`
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Naive English plural of a snake_case identifier. Words are assumed to
/// be singular; `trans` becomes `transes`.
pub fn pluralize(word: &str) -> String {
    let bytes = word.as_bytes();
    let last = bytes.last().copied();
    let before_last = bytes.len().checked_sub(2).map(|i| bytes[i]);

    match last {
        Some(b'y') if before_last.is_some_and(|b| !b"aeiou".contains(&b)) => {
            format!("{}ies", &word[..word.len() - 1])
        }
        Some(b's' | b'x' | b'z') => format!("{}es", word),
        Some(b'h') if matches!(before_last, Some(b'c' | b's')) => format!("{}es", word),
        _ => format!("{}s", word),
    }
}
