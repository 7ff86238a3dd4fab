#![forbid(unsafe_code)]

//! Page configuration.
//!
//! One builder gathers everything the controllers are configured with plus
//! the element ids the markup and the controllers agree on. Defaults
//! reproduce the demo page exactly.

use std::env;

use beacon_i18n::{I18nError, Locale, normalize_locale};
use beacon_widgets::{
    AnnouncerConfig, DialogConfig, DialogIds, FormIds, Messages, TableIds, ValidationRules,
};

/// French strings shipped with the page.
pub const FRENCH: &str = include_str!("../locales/fr.txt");

/// Everything needed to build and wire the page.
#[derive(Debug, Clone, Default)]
pub struct PageConfig {
    pub dialog: DialogConfig,
    pub rules: ValidationRules,
    pub announcer: AnnouncerConfig,
    pub dialog_ids: DialogIds,
    pub form_ids: FormIds,
    pub table_ids: TableIds,
    messages: Messages,
}

impl PageConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the bundled translations, then pick the locale from `LC_ALL`
    /// or `LANG`, falling back to English.
    pub fn from_env() -> Result<Self, I18nError> {
        let lc_all = env::var("LC_ALL").ok();
        let lang = env::var("LANG").ok();
        let locale = detect_locale_from(lc_all.as_deref(), lang.as_deref());
        Self::new().with_bundled_translations()?.locale(&locale)
    }

    /// Register the translations that ship with the page.
    pub fn with_bundled_translations(self) -> Result<Self, I18nError> {
        self.translation("fr", FRENCH)
    }

    /// Add a translation from `key = value` source.
    pub fn translation(mut self, locale: &str, source: &str) -> Result<Self, I18nError> {
        self.messages.add_translation(locale, source)?;
        Ok(self)
    }

    /// Set the active locale.
    pub fn locale(mut self, locale: &str) -> Result<Self, I18nError> {
        self.messages.set_locale(locale)?;
        Ok(self)
    }

    #[must_use]
    pub fn dialog(mut self, dialog: DialogConfig) -> Self {
        self.dialog = dialog;
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn announcer(mut self, announcer: AnnouncerConfig) -> Self {
        self.announcer = announcer;
        self
    }

    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}

fn detect_locale_from(lc_all: Option<&str>, lang: Option<&str>) -> Locale {
    lc_all
        .and_then(normalize_locale)
        .or_else(|| lang.and_then(normalize_locale))
        .unwrap_or_else(|| "en".to_owned())
}
