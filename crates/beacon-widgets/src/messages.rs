#![forbid(unsafe_code)]

//! User-facing strings.
//!
//! Every string a controller writes into the document comes from here, so a
//! translation only needs a bundle with the same keys. English is built in
//! and is the fallback for anything a translation leaves out.

use beacon_i18n::{Bundle, Catalog, I18nError, Locale, normalize_locale};

pub const NAME_REQUIRED: &str = "form.name.required";
pub const NAME_TOO_SHORT: &str = "form.name.too_short";
pub const EMAIL_REQUIRED: &str = "form.email.required";
pub const EMAIL_INVALID: &str = "form.email.invalid";
pub const MESSAGE_REQUIRED: &str = "form.message.required";
pub const MESSAGE_TOO_SHORT: &str = "form.message.too_short";
pub const STATUS_INVALID: &str = "form.status.invalid";
pub const STATUS_SENT: &str = "form.status.sent";
pub const TABLE_SORTED: &str = "table.sorted";
pub const SORT_ASCENDING: &str = "table.direction.ascending";
pub const SORT_DESCENDING: &str = "table.direction.descending";

const ENGLISH: &[(&str, &str)] = &[
    (NAME_REQUIRED, "Please enter your name."),
    (NAME_TOO_SHORT, "Name must be at least {min} characters long."),
    (EMAIL_REQUIRED, "Please enter your email address."),
    (
        EMAIL_INVALID,
        "Please enter a valid email address, for example name@example.com.",
    ),
    (MESSAGE_REQUIRED, "Please enter a message."),
    (
        MESSAGE_TOO_SHORT,
        "Message must be at least {min} characters long.",
    ),
    (
        STATUS_INVALID,
        "The form has errors. Please correct the highlighted fields and submit again.",
    ),
    (STATUS_SENT, "Thank you! Your message has been sent."),
    (TABLE_SORTED, "Table sorted by {column}, {direction}."),
    (SORT_ASCENDING, "ascending"),
    (SORT_DESCENDING, "descending"),
];

/// Catalog plus the active locale.
#[derive(Debug, Clone)]
pub struct Messages {
    catalog: Catalog,
    locale: Locale,
}

impl Default for Messages {
    fn default() -> Self {
        Self::english()
    }
}

impl Messages {
    /// Built-in English strings.
    #[must_use]
    pub fn english() -> Self {
        let mut bundle = Bundle::new();
        for &(key, value) in ENGLISH {
            bundle.insert(key, value);
        }
        let mut catalog = Catalog::new("en");
        catalog.add_bundle("en", bundle);
        Self {
            catalog,
            locale: "en".to_owned(),
        }
    }

    /// Add a translation from `key = value` source text.
    pub fn add_translation(&mut self, locale: &str, source: &str) -> Result<(), I18nError> {
        let bundle = Bundle::parse(locale, source)?;
        self.catalog.add_bundle(locale, bundle);
        Ok(())
    }

    /// Switch the active locale.
    pub fn set_locale(&mut self, locale: &str) -> Result<(), I18nError> {
        self.locale =
            normalize_locale(locale).ok_or_else(|| I18nError::InvalidLocale(locale.to_owned()))?;
        Ok(())
    }

    /// Builder form of [`set_locale`](Self::set_locale); invalid tags keep
    /// the current locale.
    #[must_use]
    pub fn with_locale(mut self, locale: &str) -> Self {
        let _ = self.set_locale(locale);
        self
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Render a message. A key missing from every bundle renders as the key
    /// itself so the gap is visible instead of silent.
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.catalog
            .format(&self.locale, key, args)
            .unwrap_or_else(|| key.to_owned())
    }

    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.format(key, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_covers_every_key() {
        let m = Messages::english();
        for &(key, _) in ENGLISH {
            assert_ne!(m.text(key), key, "{key} should resolve");
        }
    }

    #[test]
    fn sort_announcement_template() {
        let m = Messages::english();
        assert_eq!(
            m.format(TABLE_SORTED, &[("column", "Year"), ("direction", "descending")]),
            "Table sorted by Year, descending."
        );
    }

    #[test]
    fn translation_falls_back_to_english() {
        let mut m = Messages::english();
        m.add_translation("fr", "table.direction.ascending = croissant\n")
            .unwrap();
        m.set_locale("fr_FR").unwrap();
        assert_eq!(m.locale(), "fr-FR");
        assert_eq!(m.text(SORT_ASCENDING), "croissant");
        assert_eq!(m.text(SORT_DESCENDING), "descending");
    }

    #[test]
    fn bad_translation_is_rejected() {
        let mut m = Messages::english();
        assert!(m.add_translation("de", "no separator here").is_err());
        assert!(m.set_locale("   ").is_err());
        assert_eq!(m.locale(), "en");
    }

    #[test]
    fn unknown_key_renders_as_key() {
        assert_eq!(Messages::english().text("nope.missing"), "nope.missing");
    }
}
