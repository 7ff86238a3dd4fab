//! Message catalog with locale fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: a lookup tries the requested locale,
//!    then its base language (`fr-CA` → `fr`), then the catalog default,
//!    each at most once.
//!
//! 2. **Interpolation is single-pass**: `{name}` tokens are replaced once;
//!    substituted values are never re-scanned.
//!
//! 3. **Immutable after load**: a `Catalog` is `Send + Sync` and lookups
//!    never mutate it.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key in no locale of the chain | `None` / `I18nError::MissingKey` |
//! | Bad bundle line | No `=` separator | `I18nError::ParseError` |
//! | Duplicate key | Same key twice in one bundle source | `I18nError::DuplicateKey` |
//! | Missing arg | `{name}` with no `name` arg | Token left as-is |

use std::collections::HashMap;

/// Locale identifier (e.g., `"en"`, `"en-US"`, `"fr"`).
pub type Locale = String;

/// Errors from catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale string was empty or malformed.
    InvalidLocale(String),
    /// A bundle source line could not be parsed.
    ParseError { line: usize, message: String },
    /// Duplicate key in the same bundle.
    DuplicateKey { locale: String, key: String },
    /// No locale in the fallback chain provides the key.
    MissingKey { locale: String, key: String },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: {l:?}"),
            Self::ParseError { line, message } => write!(f, "line {line}: {message}"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
            Self::MissingKey { locale, key } => {
                write!(f, "no message '{key}' for locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Messages for a single locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    messages: HashMap<String, String>,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bundle from `key = value` lines.
    ///
    /// Blank lines and lines starting with `#` are ignored. Keys and values
    /// are trimmed; the value is everything after the first `=`.
    ///
    /// ```
    /// use beacon_i18n::Bundle;
    ///
    /// let bundle = Bundle::parse("en", "# form\nname.required = Please enter your name.\n").unwrap();
    /// assert_eq!(bundle.get("name.required"), Some("Please enter your name."));
    /// ```
    pub fn parse(locale: &str, source: &str) -> Result<Self, I18nError> {
        let mut bundle = Self::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(I18nError::ParseError {
                    line: idx + 1,
                    message: format!("expected `key = value`, got {line:?}"),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(I18nError::ParseError {
                    line: idx + 1,
                    message: "empty key".into(),
                });
            }
            if bundle.messages.contains_key(key) {
                return Err(I18nError::DuplicateKey {
                    locale: locale.to_owned(),
                    key: key.to_owned(),
                });
            }
            bundle.insert(key, value.trim());
        }
        Ok(bundle)
    }

    /// Insert or replace a message.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.messages.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Per-locale bundles with a default locale of last resort.
///
/// ```
/// use beacon_i18n::{Bundle, Catalog};
///
/// let mut en = Bundle::new();
/// en.insert("sorted", "Table sorted by {column}, {direction}.");
/// let mut catalog = Catalog::new("en");
/// catalog.add_bundle("en", en);
///
/// assert_eq!(
///     catalog.format("en-GB", "sorted", &[("column", "Year"), ("direction", "ascending")]),
///     Some("Table sorted by Year, ascending.".into())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    bundles: HashMap<Locale, Bundle>,
    default_locale: Locale,
}

impl Catalog {
    /// Create an empty catalog whose last-resort locale is `default_locale`.
    #[must_use]
    pub fn new(default_locale: impl Into<Locale>) -> Self {
        Self {
            bundles: HashMap::new(),
            default_locale: normalize_locale(&default_locale.into())
                .unwrap_or_else(|| "en".to_owned()),
        }
    }

    /// Add (or merge into) the bundle for `locale`.
    ///
    /// Keys already present for the locale are replaced.
    pub fn add_bundle(&mut self, locale: &str, bundle: Bundle) {
        let locale = normalize_locale(locale).unwrap_or_else(|| self.default_locale.clone());
        let entry = self.bundles.entry(locale).or_default();
        for (k, v) in bundle.messages {
            entry.messages.insert(k, v);
        }
    }

    /// The last-resort locale.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Locales consulted for `locale`, most specific first, without repeats.
    #[must_use]
    pub fn fallback_chain(&self, locale: &str) -> Vec<Locale> {
        let mut chain: Vec<Locale> = Vec::with_capacity(3);
        if let Some(norm) = normalize_locale(locale) {
            if let Some((base, _)) = norm.split_once('-') {
                let base = base.to_owned();
                chain.push(norm);
                chain.push(base);
            } else {
                chain.push(norm);
            }
        }
        if !chain.contains(&self.default_locale) {
            chain.push(self.default_locale.clone());
        }
        chain
    }

    /// Look up a message, walking the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.fallback_chain(locale)
            .iter()
            .find_map(|l| self.bundles.get(l).and_then(|b| b.get(key)))
    }

    /// Look up a message and interpolate `{name}` tokens.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key)
            .map(|template| interpolate(template, args))
    }

    /// Like [`format`](Self::format), but a missing key is an error.
    pub fn try_format(
        &self,
        locale: &str,
        key: &str,
        args: &[(&str, &str)],
    ) -> Result<String, I18nError> {
        self.format(locale, key, args)
            .ok_or_else(|| I18nError::MissingKey {
                locale: locale.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Keys present in the default bundle but missing from `locale`'s own
    /// bundle, sorted. Useful to audit a translation.
    #[must_use]
    pub fn missing_keys(&self, locale: &str) -> Vec<&str> {
        let Some(default) = self.bundles.get(&self.default_locale) else {
            return Vec::new();
        };
        let own = normalize_locale(locale).and_then(|l| self.bundles.get(&l));
        let mut missing: Vec<&str> = default
            .messages
            .keys()
            .map(String::as_str)
            .filter(|k| own.is_none_or(|b| b.get(k).is_none()))
            .collect();
        missing.sort_unstable();
        missing
    }

    /// All registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

/// Normalize a locale tag: strip encoding/modifier suffixes (`fr_FR.UTF-8@euro`),
/// use `-` separators, lowercase the language and uppercase the region.
///
/// `C`/`POSIX` map to `en`. Returns `None` for empty input.
///
/// ```
/// use beacon_i18n::normalize_locale;
///
/// assert_eq!(normalize_locale("fr_fr.UTF-8").as_deref(), Some("fr-FR"));
/// assert_eq!(normalize_locale("POSIX").as_deref(), Some("en"));
/// assert_eq!(normalize_locale("  "), None);
/// ```
#[must_use]
pub fn normalize_locale(raw: &str) -> Option<Locale> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return Some("en".to_owned());
    }
    let mut parts = raw.split(['_', '-']).filter(|p| !p.is_empty());
    let lang = parts.next()?.to_ascii_lowercase();
    let mut out = lang;
    for part in parts {
        out.push('-');
        if part.len() == 2 {
            out.push_str(&part.to_ascii_uppercase());
        } else {
            out.push_str(part);
        }
    }
    Some(out)
}

/// Single-pass `{name}` interpolation. Unmatched tokens left as-is.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match args.iter().find(|&&(name, _)| name == token) {
                    Some(&(_, value)) => result.push_str(value),
                    None => {
                        result.push('{');
                        result.push_str(token);
                        result.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
