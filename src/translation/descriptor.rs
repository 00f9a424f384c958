/*!
 * Entity type descriptors.
 *
 * A descriptor declares what a primary entity type looks like to the
 * translation layer: its name, which attributes are translatable, its
 * mass-assignment allow-lists and any per-type naming or fallback overrides.
 */

use std::collections::BTreeSet;

/// Mass-assignment allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList {
    /// Every attribute may be mass-assigned
    Any,
    /// Only the listed attributes; an empty list guards the whole model
    Only(BTreeSet<String>),
}

impl AllowList {
    /// Allow only the given attributes
    pub fn only(fields: &[&str]) -> Self {
        Self::Only(fields.iter().map(|f| f.to_string()).collect())
    }

    /// Allow nothing
    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    /// Whether `field` may be mass-assigned
    pub fn allows(&self, field: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(fields) => fields.contains(field),
        }
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::none()
    }
}

/// Per-type declaration of a translatable primary entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    name: String,
    primary_key: String,
    table: Option<String>,
    translated_attributes: Vec<String>,
    fillable: AllowList,
    translation_fillable: AllowList,
    translation_model: Option<String>,
    translation_table: Option<String>,
    translation_foreign_key: Option<String>,
    locale_key: Option<String>,
    use_translation_fallback: Option<bool>,
    timestamps: bool,
}

impl EntityDescriptor {
    /// Describe an entity type by its model name, e.g. `"Country"`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            primary_key: "id".to_string(),
            table: None,
            translated_attributes: Vec::new(),
            fillable: AllowList::none(),
            translation_fillable: AllowList::none(),
            translation_model: None,
            translation_table: None,
            translation_foreign_key: None,
            locale_key: None,
            use_translation_fallback: None,
            timestamps: false,
        }
    }

    /// Declare the translatable attributes
    pub fn translated(mut self, attributes: &[&str]) -> Self {
        self.translated_attributes = attributes.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Set the primary entity's mass-assignment allow-list
    pub fn fillable(mut self, fillable: AllowList) -> Self {
        self.fillable = fillable;
        self
    }

    /// Set the translation model's mass-assignment allow-list
    pub fn translation_fillable(mut self, fillable: AllowList) -> Self {
        self.translation_fillable = fillable;
        self
    }

    /// Override the primary key column (default `id`)
    pub fn with_primary_key(mut self, key: &str) -> Self {
        self.primary_key = key.to_string();
        self
    }

    /// Override the primary table name
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Override the translation model name
    pub fn with_translation_model(mut self, model: &str) -> Self {
        self.translation_model = Some(model.to_string());
        self
    }

    /// Override the translation table name
    pub fn with_translation_table(mut self, table: &str) -> Self {
        self.translation_table = Some(table.to_string());
        self
    }

    /// Override the foreign key linking translations to this entity
    pub fn with_translation_foreign_key(mut self, key: &str) -> Self {
        self.translation_foreign_key = Some(key.to_string());
        self
    }

    /// Override the locale column of the translation table
    pub fn with_locale_key(mut self, key: &str) -> Self {
        self.locale_key = Some(key.to_string());
        self
    }

    /// Decide fallback for this type instead of the global default
    pub fn with_translation_fallback(mut self, enabled: bool) -> Self {
        self.use_translation_fallback = Some(enabled);
        self
    }

    /// Maintain `created_at`/`updated_at` on the primary table
    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn table_override(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn translated_attributes(&self) -> &[String] {
        &self.translated_attributes
    }

    /// Whether `attribute` lives in the translation table
    pub fn is_translated(&self, attribute: &str) -> bool {
        self.translated_attributes.iter().any(|a| a == attribute)
    }

    pub fn fillable_list(&self) -> &AllowList {
        &self.fillable
    }

    pub fn translation_fillable_list(&self) -> &AllowList {
        &self.translation_fillable
    }

    pub fn translation_model_override(&self) -> Option<&str> {
        self.translation_model.as_deref()
    }

    pub fn translation_table_override(&self) -> Option<&str> {
        self.translation_table.as_deref()
    }

    pub fn translation_foreign_key_override(&self) -> Option<&str> {
        self.translation_foreign_key.as_deref()
    }

    pub fn locale_key_override(&self) -> Option<&str> {
        self.locale_key.as_deref()
    }

    pub fn use_translation_fallback(&self) -> Option<bool> {
        self.use_translation_fallback
    }

    pub fn timestamps(&self) -> bool {
        self.timestamps
    }
}
