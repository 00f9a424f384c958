/*!
 * Integration tests for locale-keyed mass assignment
 */

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use translatable::{AllowList, EntityType, LocaleContext, TranslatableConfig};

use crate::common;

fn name_in(country: &mut translatable::TranslatableEntity, ctx: &LocaleContext, locale: &str) -> Result<Option<String>> {
    let record = country.translate(ctx, Some(locale), false)?;
    Ok(record.and_then(|r| r.get_str("name")).map(str::to_string))
}

#[test]
fn test_create_withTranslatedAttribute_shouldUseCurrentLocale() -> Result<()> {
    let (countries, _repo) = common::seeded_countries(TranslatableConfig::default())?;
    let ctx = LocaleContext::new("en");

    let mut country = countries.create(&ctx, &json!({"iso": "be", "name": "Belgium"}))?;

    assert_eq!(country.attribute(&ctx, "iso")?, Some(json!("be")));
    assert_eq!(country.attribute(&ctx, "name")?, Some(json!("Belgium")));
    assert!(country.exists());
    assert!(!country.is_dirty());
    Ok(())
}

#[test]
fn test_create_withLocaleSubMaps_shouldFillEachTranslation() -> Result<()> {
    let (countries, _repo) = common::seeded_countries(TranslatableConfig::default())?;
    let ctx = LocaleContext::new("en");
    let input = json!({
        "iso": "be",
        "en": {"name": "Belgium"},
        "fr": {"name": "Belgique"}
    });

    let mut country = countries.create(&ctx, &input)?;
    assert_eq!(country.attribute(&ctx, "iso")?, Some(json!("be")));
    assert_eq!(name_in(&mut country, &ctx, "en")?, Some("Belgium".to_string()));
    assert_eq!(name_in(&mut country, &ctx, "fr")?, Some("Belgique".to_string()));

    let mut country = countries.first_where("iso", "be")?.unwrap();
    assert_eq!(name_in(&mut country, &ctx, "en")?, Some("Belgium".to_string()));
    assert_eq!(name_in(&mut country, &ctx, "fr")?, Some("Belgique".to_string()));
    Ok(())
}

#[test]
fn test_create_withGuardedTranslationModel_shouldSkipFields() -> Result<()> {
    let config = TranslatableConfig::default();
    let repo = common::create_repository(&config)?;
    let strict = EntityType::new(common::country_strict_descriptor(), Arc::new(config), Arc::new(repo.clone()));
    let ctx = LocaleContext::new("en");
    let input = json!({
        "iso": "be",
        "en": {"name": "Belgium"},
        "fr": {"name": "Belgique"}
    });

    let mut country = strict.create(&ctx, &input)?;

    assert_eq!(country.attribute(&ctx, "iso")?, Some(json!("be")));
    let en = country.translate(&ctx, Some("en"), true)?.expect("en row is created by fill");
    assert_eq!(en.get("name"), None);
    let fr = country.translate(&ctx, Some("fr"), true)?.expect("fr row is created by fill");
    assert_eq!(fr.get("name"), None);

    // Rows holding nothing but their keys are never written
    assert_eq!(repo.connection().row_count("countries")?, 1);
    assert_eq!(repo.connection().row_count("country_translations")?, 0);
    Ok(())
}

#[test]
fn test_fill_withFallbackSet_shouldFillNonDefaultLanguage() -> Result<()> {
    let config = TranslatableConfig::default().with_fallback_locale("en");
    let (countries, _repo) = common::seeded_countries(config)?;
    let ctx = LocaleContext::new("en");

    let mut country = countries.new_entity();
    country.fill(
        &ctx,
        &json!({
            "iso": "gr",
            "en": {"name": "Greece"},
            "de": {"name": "Griechenland"}
        }),
    )?;

    assert_eq!(name_in(&mut country, &ctx, "en")?, Some("Greece".to_string()));
    assert_eq!(name_in(&mut country, &ctx, "de")?, Some("Griechenland".to_string()));
    assert!(!country.exists());
    Ok(())
}

#[test]
fn test_create_thenTranslateMut_withFallbackSet_shouldKeepEachLocale() -> Result<()> {
    let config = TranslatableConfig::default().with_fallback_locale("en");
    let (countries, _repo) = common::seeded_countries(config)?;
    let ctx = LocaleContext::new("en");

    let mut country = countries.create(&ctx, &json!({"iso": "gr"}))?;
    country.set_use_translation_fallback(Some(true));
    country.translate_mut(&ctx, Some("en"))?.set("name", "Greece");
    country.translate_mut(&ctx, Some("de"))?.set("name", "Griechenland");

    let en = country.translate(&ctx, Some("en"), true)?.unwrap();
    assert_eq!(en.get_str("name"), Some("Greece"));
    Ok(())
}

#[test]
fn test_fill_shouldDropUnknownAndGuardedKeys() -> Result<()> {
    let (countries, _repo) = common::seeded_countries(TranslatableConfig::default())?;
    let ctx = LocaleContext::new("en");

    let mut country = countries.new_entity();
    country.fill(
        &ctx,
        &json!({
            "id": 99,
            "iso": "nl",
            "population": 17,
            "en": {"name": "Netherlands", "locale": "xx", "country_id": 1, "motto": "Je maintiendrai"}
        }),
    )?;

    assert_eq!(country.id(), None);
    assert_eq!(country.attribute(&ctx, "population")?, None);

    let en = country.translate(&ctx, Some("en"), false)?.unwrap();
    assert_eq!(en.get_str("name"), Some("Netherlands"));
    assert_eq!(en.get_str("locale"), Some("en"));
    assert_eq!(en.get("country_id"), None);
    assert_eq!(en.get("motto"), None);

    country.save()?;
    let id = country.id();
    assert!(id.is_some());
    let en = country.translate(&ctx, Some("en"), false)?.unwrap();
    assert_eq!(en.get_i64("country_id"), id);
    Ok(())
}

#[test]
fn test_fill_withConfiguredLocales_shouldOnlyRouteKnownLocales() -> Result<()> {
    let mut config = TranslatableConfig::default();
    config.locales = vec!["en".to_string(), "fr".to_string()];
    let repo = common::create_repository(&config)?;
    let descriptor = common::country_descriptor().fillable(AllowList::Any);
    let countries = EntityType::new(descriptor, Arc::new(config), Arc::new(repo));
    let ctx = LocaleContext::new("en");

    let mut country = countries.new_entity();
    country.fill(
        &ctx,
        &json!({
            "iso": "be",
            "fr": {"name": "Belgique"},
            "xx": {"name": "???"}
        }),
    )?;

    assert_eq!(country.cached_locales(), vec!["fr".to_string()]);
    Ok(())
}

#[test]
fn test_fill_withNonObjectInput_shouldBeIgnored() -> Result<()> {
    let (countries, _repo) = common::seeded_countries(TranslatableConfig::default())?;
    let ctx = LocaleContext::new("en");

    let mut country = countries.new_entity();
    country.fill(&ctx, &json!(["iso", "be"]))?;

    assert!(country.attributes().is_empty());
    assert!(country.cached_locales().is_empty());
    Ok(())
}
