/*!
 * Translation resolution and persistence engine.
 *
 * This module gives primary entities locale-aware access to the rows of
 * their companion translation table. It is split into several submodules:
 *
 * - `descriptor`: Per-type declaration of translatable entities
 * - `naming`: Translation model, table, foreign key and locale column names
 * - `locale`: Current locale context and fallback decisions
 * - `cache`: Per-entity locale to translation record cache
 * - `entity`: Attribute routing and translation accessors
 * - `persistence`: Saving an entity together with its translations
 * - `mass_assignment`: Routing keyed input to the entity and its translations
 */

// Re-export main types for easier usage
pub use self::cache::{Lookup, TranslationCache, TranslationRecord};
pub use self::descriptor::{AllowList, EntityDescriptor};
pub use self::entity::{EntityType, TranslatableEntity};
pub use self::locale::{FallbackPolicy, LocaleContext};
pub use self::naming::NamingResolver;

// Submodules
pub mod cache;
pub mod descriptor;
pub mod entity;
pub mod locale;
pub mod mass_assignment;
pub mod naming;
pub mod persistence;
