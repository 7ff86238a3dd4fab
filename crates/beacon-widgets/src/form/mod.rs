#![forbid(unsafe_code)]

//! Contact form validation.
//!
//! Fields are checked when they lose focus and all together on submit.
//! Typing never triggers validation. Errors are shown next to each field and
//! reach assistive technology through `aria-invalid`, `aria-describedby`
//! and a polite live error container.
//!
//! # Invariants
//!
//! 1. A field is marked invalid exactly when its error container holds
//!    non-empty text and is not hidden.
//! 2. A failed submit focuses the first failing field in form order
//!    (name, email, message).
//! 3. The submission status text is distinct from every field message.

mod controller;
mod rules;

pub use controller::{FieldIds, FormIds, FormValidator, SubmitOutcome};
pub use rules::{DEFAULT_EMAIL_PATTERN, FieldError, FieldKind, ValidationRules};
