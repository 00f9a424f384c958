/*!
 * Tests for translation naming conventions as seen from entities
 */

use anyhow::Result;
use std::sync::Arc;
use translatable::{EntityDescriptor, EntityType, Repository, TranslatableConfig};

use crate::common;

fn country_type(descriptor: EntityDescriptor, config: TranslatableConfig) -> Result<EntityType> {
    let repo = Repository::new_in_memory()?;
    Ok(EntityType::new(descriptor, Arc::new(config), Arc::new(repo)))
}

#[test]
fn test_translationModelName_withDefaults_shouldAppendSuffix() -> Result<()> {
    let countries = country_type(common::country_descriptor(), TranslatableConfig::default())?;
    let country = countries.new_entity();

    assert_eq!(country.translation_model_name_default(), "CountryTranslation");
    assert_eq!(country.translation_model_name(), "CountryTranslation");
    Ok(())
}

#[test]
fn test_translationModelName_withSuffixSet_shouldUseSuffix() -> Result<()> {
    let config = TranslatableConfig::default().with_translation_suffix("Trans");
    let countries = country_type(common::country_descriptor(), config)?;
    let country = countries.new_entity();

    assert_eq!(country.translation_model_name(), "CountryTrans");
    assert_eq!(country.relation_key(), "country_id");
    Ok(())
}

#[test]
fn test_translationModelName_withOverride_shouldReturnCustomName() -> Result<()> {
    let descriptor = common::country_descriptor().with_translation_model("MyAwesomeCountryTranslation");
    let countries = country_type(descriptor, TranslatableConfig::default())?;
    let country = countries.new_entity();

    assert_eq!(country.translation_model_name(), "MyAwesomeCountryTranslation");
    assert_eq!(country.translation_model_name_default(), "CountryTranslation");
    Ok(())
}

#[test]
fn test_relationKey_shouldDefaultAndOverride() -> Result<()> {
    let countries = country_type(common::country_descriptor(), TranslatableConfig::default())?;
    assert_eq!(countries.new_entity().relation_key(), "country_id");

    let descriptor = common::country_descriptor().with_translation_foreign_key("my_awesome_key");
    let countries = country_type(descriptor, TranslatableConfig::default())?;
    assert_eq!(countries.new_entity().relation_key(), "my_awesome_key");
    Ok(())
}

#[test]
fn test_localeKey_shouldBeLocaleByDefault() -> Result<()> {
    let countries = country_type(common::country_descriptor(), TranslatableConfig::default())?;
    assert_eq!(countries.new_entity().locale_key(), "locale");
    Ok(())
}

#[test]
fn test_localeKey_canBeOverriddenInConfiguration() -> Result<()> {
    let config = TranslatableConfig::default().with_locale_key("language_id");
    let countries = country_type(common::country_descriptor(), config)?;
    assert_eq!(countries.new_entity().locale_key(), "language_id");
    Ok(())
}

#[test]
fn test_localeKey_perModelOverride_shouldWinOverConfiguration() -> Result<()> {
    let config = TranslatableConfig::default().with_locale_key("lang");
    let descriptor = EntityDescriptor::new("CountryWithCustomLocaleKey")
        .translated(&["name"])
        .with_locale_key("language_id");
    let countries = country_type(descriptor, config)?;

    assert_eq!(countries.new_entity().locale_key(), "language_id");
    Ok(())
}

#[test]
fn test_tableNames_shouldFollowModelNames() -> Result<()> {
    let countries = country_type(common::country_descriptor(), TranslatableConfig::default())?;
    let naming = countries.naming();

    assert_eq!(naming.primary_table(), "countries");
    assert_eq!(naming.translation_table(), "country_translations");
    Ok(())
}
