//! Locale-style string ordering.
//!
//! [`Collator`] compares strings the way a reader expects a sorted column to
//! look rather than by code point: `"apple"` sorts next to `"Apple"` and
//! `"Émile"` next to `"Emile"`, while the order stays total.
//!
//! Comparison is layered. Each level only breaks ties left by the previous:
//!
//! | Level | Key |
//! |-------|-----|
//! | Primary | NFD base letters, lowercased, combining marks dropped |
//! | Secondary | combining marks (accents) |
//! | Tertiary | case (lowercase before uppercase) |
//! | Identical | NFC code points |
//!
//! # Invariants
//!
//! 1. `compare` is a total order: antisymmetric, transitive, and
//!    `Equal` only for strings with the same NFC form.
//! 2. [`Strength`] only controls which levels are consulted before the
//!    identical-level tie break; it never makes distinct strings equal.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Deepest comparison level consulted before the code-point tie break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Strength {
    /// Base letters only.
    Primary,
    /// Base letters, then accents.
    Secondary,
    /// Base letters, accents, then case.
    #[default]
    Tertiary,
}

/// String comparator with locale-style ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collator {
    strength: Strength,
}

impl Collator {
    /// Create a collator at the default (tertiary) strength.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strength: Strength::Tertiary,
        }
    }

    /// Set the comparison strength.
    #[must_use]
    pub const fn strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Compare two strings.
    ///
    /// ```
    /// use beacon_i18n::Collator;
    /// use std::cmp::Ordering;
    ///
    /// let c = Collator::new();
    /// assert_eq!(c.compare("apple", "Banana"), Ordering::Less);
    /// assert_eq!(c.compare("résumé", "resume"), Ordering::Greater);
    /// ```
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = primary_key(a).cmp(primary_key(b));
        if primary != Ordering::Equal {
            return primary;
        }
        if self.strength >= Strength::Secondary {
            let secondary = accent_key(a).cmp(&accent_key(b));
            if secondary != Ordering::Equal {
                return secondary;
            }
        }
        if self.strength >= Strength::Tertiary {
            let tertiary = case_key(a).cmp(case_key(b));
            if tertiary != Ordering::Equal {
                return tertiary;
            }
        }
        a.nfc().cmp(b.nfc())
    }

    /// Sort `items` in place by the string `key` returns.
    pub fn sort_by_key<T>(&self, items: &mut [T], key: impl Fn(&T) -> &str) {
        items.sort_by(|x, y| self.compare(key(x), key(y)));
    }
}

fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(char::to_lowercase)
}

/// Per base character, the combining marks that follow it.
fn accent_key(s: &str) -> Vec<Vec<char>> {
    let mut out: Vec<Vec<char>> = Vec::new();
    for c in s.nfd() {
        if is_combining_mark(c) {
            if let Some(last) = out.last_mut() {
                last.push(c);
            } else {
                out.push(vec![c]);
            }
        } else {
            out.push(Vec::new());
        }
    }
    out
}

/// `false` for lowercase/uncased, `true` for uppercase, per base character.
fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|&c| !is_combining_mark(c))
        .map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted(words: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = words.iter().map(|s| (*s).to_owned()).collect();
        Collator::new().sort_by_key(&mut v, String::as_str);
        v
    }

    #[test]
    fn case_insensitive_primary() {
        assert_eq!(
            sorted(&["banana", "Apple", "cherry"]),
            vec!["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn lowercase_before_uppercase_on_tie() {
        assert_eq!(sorted(&["Rust", "rust"]), vec!["rust", "Rust"]);
    }

    #[test]
    fn accents_sort_next_to_base_letter() {
        assert_eq!(
            sorted(&["Zoe", "Émile", "Emma", "Emile"]),
            vec!["Emile", "Émile", "Emma", "Zoe"]
        );
    }

    #[test]
    fn accent_outranks_case() {
        let c = Collator::new().strength(Strength::Secondary);
        assert_eq!(c.compare("résumé", "Resume"), Ordering::Greater);
        assert_eq!(c.compare("Resume", "résumé"), Ordering::Less);
    }

    #[test]
    fn composed_and_decomposed_are_equal() {
        let c = Collator::new();
        assert_eq!(c.compare("caf\u{e9}", "cafe\u{301}"), Ordering::Equal);
    }

    #[test]
    fn primary_strength_still_total() {
        let c = Collator::new().strength(Strength::Primary);
        assert_eq!(c.compare("a", "A"), Ordering::Greater);
        assert_eq!(c.compare("a", "b"), Ordering::Less);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(sorted(&["Ruby", "Rub"]), vec!["Rub", "Ruby"]);
    }

    proptest! {
        #[test]
        fn antisymmetric(a in "\\PC{0,8}", b in "\\PC{0,8}") {
            let c = Collator::new();
            prop_assert_eq!(c.compare(&a, &b), c.compare(&b, &a).reverse());
        }

        #[test]
        fn transitive(a in "[a-eA-Eé]{0,4}", b in "[a-eA-Eé]{0,4}", x in "[a-eA-Eé]{0,4}") {
            let c = Collator::new();
            if c.compare(&a, &b) != Ordering::Greater && c.compare(&b, &x) != Ordering::Greater {
                prop_assert_ne!(c.compare(&a, &x), Ordering::Greater);
            }
        }

        #[test]
        fn equal_only_when_nfc_equal(a in "\\PC{0,6}", b in "\\PC{0,6}") {
            let c = Collator::new();
            if c.compare(&a, &b) == Ordering::Equal {
                prop_assert_eq!(a.nfc().collect::<String>(), b.nfc().collect::<String>());
            }
        }
    }
}
