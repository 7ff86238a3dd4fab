#![forbid(unsafe_code)]

//! Localization support for Beacon.
//!
//! - [`catalog`]: per-locale message bundles with fallback and `{name}`
//!   interpolation.
//! - [`collate`]: locale-style string ordering used when sorting text.

pub mod catalog;
pub mod collate;

pub use catalog::{Bundle, Catalog, I18nError, Locale, normalize_locale};
pub use collate::{Collator, Strength};
