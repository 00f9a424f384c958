/*!
 * Locale resolution.
 *
 * The current locale travels in an explicit `LocaleContext` handed to every
 * call that needs it. Fallback decisions follow per-call > per-entity >
 * configuration precedence.
 */

use crate::app_config::TranslatableConfig;

/// Request-scoped holder of the current locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    current: String,
}

impl LocaleContext {
    pub fn new(locale: &str) -> Self {
        Self {
            current: locale.to_string(),
        }
    }

    /// Start from the configured default locale
    pub fn from_config(config: &TranslatableConfig) -> Self {
        Self::new(&config.default_locale)
    }

    pub fn locale(&self) -> &str {
        &self.current
    }

    pub fn set_locale(&mut self, locale: &str) {
        self.current = locale.to_string();
    }
}

/// Pick the explicit locale if given, else the context's current one
pub fn resolve<'a>(ctx: &'a LocaleContext, explicit: Option<&'a str>) -> &'a str {
    explicit.unwrap_or_else(|| ctx.locale())
}

/// Whether lookups fall back, and to which locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy<'a> {
    Disabled,
    Enabled(Option<&'a str>),
}

impl<'a> FallbackPolicy<'a> {
    /// Decide from the per-call and per-entity flags, then the configuration
    pub fn decide(
        config: &'a TranslatableConfig,
        entity_flag: Option<bool>,
        per_call: Option<bool>,
    ) -> Self {
        let enabled = per_call
            .or(entity_flag)
            .unwrap_or(config.use_translation_fallback);

        if enabled {
            Self::Enabled(config.fallback_locale())
        } else {
            Self::Disabled
        }
    }

    /// The locale to consult when the requested one is missing
    pub fn target(&self) -> Option<&'a str> {
        match self {
            Self::Disabled => None,
            Self::Enabled(locale) => *locale,
        }
    }
}

/// Fallback locale for a lookup, or `None` when fallback does not apply
pub fn fallback_locale<'a>(
    config: &'a TranslatableConfig,
    entity_flag: Option<bool>,
    per_call: Option<bool>,
) -> Option<&'a str> {
    FallbackPolicy::decide(config, entity_flag, per_call).target()
}
