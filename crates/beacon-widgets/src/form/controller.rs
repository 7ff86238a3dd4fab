#![forbid(unsafe_code)]

use std::time::Duration;

use beacon_core::{Document, Event, EventResult, NodeId};

use super::rules::{FieldError, FieldKind, ValidationRules};
use crate::live_region::{Announcer, AnnouncerConfig};
use crate::messages::{Messages, STATUS_INVALID, STATUS_SENT};
use crate::{Controller, WireError, require};

const NAME: &str = "form";

/// Ids of one field's input and its error container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub input: String,
    pub error: String,
}

impl FieldIds {
    fn conventional(input: &str) -> Self {
        Self {
            input: input.to_owned(),
            error: format!("{input}-error"),
        }
    }
}

/// Element ids the form validator binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormIds {
    pub form: String,
    pub name: FieldIds,
    pub email: FieldIds,
    pub message: FieldIds,
    /// Polite live region for the submission outcome.
    pub status: String,
}

impl Default for FormIds {
    fn default() -> Self {
        Self {
            form: "contact-form".into(),
            name: FieldIds::conventional("name"),
            email: FieldIds::conventional("email"),
            message: FieldIds::conventional("message"),
            status: "form-status".into(),
        }
    }
}

impl FormIds {
    #[must_use]
    pub fn field(&self, kind: FieldKind) -> &FieldIds {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::Email => &self.email,
            FieldKind::Message => &self.message,
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; focus moved to `first`.
    Invalid { first: FieldKind, errors: usize },
    /// Every field passed and the form was cleared.
    Sent,
}

#[derive(Debug, Clone, Copy)]
struct FieldSlot {
    input: NodeId,
    error: NodeId,
}

/// Contact form validator.
///
/// Each field's error state lives in the document: `aria-invalid="true"` on
/// the input and a visible, non-empty error container, always together.
/// The submission status goes through an [`Announcer`], so a repeated
/// outcome is announced again.
#[derive(Debug, Clone)]
pub struct FormValidator {
    form: NodeId,
    fields: [FieldSlot; 3],
    status: Announcer,
    rules: ValidationRules,
    messages: Messages,
}

impl FormValidator {
    /// Bind to the form markup, linking each input to its error container.
    pub fn attach(
        doc: &mut Document,
        ids: &FormIds,
        rules: ValidationRules,
        announcer: AnnouncerConfig,
        messages: Messages,
    ) -> Result<Self, WireError> {
        let form = require(doc, NAME, &ids.form)?;
        let mut fields = [FieldSlot {
            input: form,
            error: form,
        }; 3];
        for kind in FieldKind::ALL {
            let field = ids.field(kind);
            fields[kind.index()] = FieldSlot {
                input: require(doc, NAME, &field.input)?,
                error: require(doc, NAME, &field.error)?,
            };
        }
        let status = require(doc, NAME, &ids.status)?;

        let validator = Self {
            form,
            fields,
            status: Announcer::new(status, announcer),
            rules,
            messages,
        };
        for kind in FieldKind::ALL {
            let slot = validator.slot(kind);
            link_description(doc, slot.input, &ids.field(kind).error);
            validator.render(doc, kind, None);
        }
        Ok(validator)
    }

    fn slot(&self, kind: FieldKind) -> FieldSlot {
        self.fields[kind.index()]
    }

    #[must_use]
    pub fn form(&self) -> NodeId {
        self.form
    }

    /// The status live region.
    #[must_use]
    pub fn status(&self) -> NodeId {
        self.status.region()
    }

    #[must_use]
    pub fn announcer(&self) -> &Announcer {
        &self.status
    }

    #[must_use]
    pub fn input(&self, kind: FieldKind) -> NodeId {
        self.slot(kind).input
    }

    #[must_use]
    pub fn error_element(&self, kind: FieldKind) -> NodeId {
        self.slot(kind).error
    }

    #[must_use]
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Which field `node` is the input of.
    #[must_use]
    pub fn field_for(&self, node: NodeId) -> Option<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .find(|&k| self.slot(k).input == node)
    }

    /// Whether `kind` currently shows an error.
    #[must_use]
    pub fn is_invalid(&self, doc: &Document, kind: FieldKind) -> bool {
        doc.attr_is(self.slot(kind).input, "aria-invalid", "true")
    }

    /// Check one field and render its error state.
    pub fn validate_field(&self, doc: &mut Document, kind: FieldKind) -> Result<(), FieldError> {
        let outcome = self.rules.check(kind, doc.value(self.slot(kind).input));
        self.render(doc, kind, outcome.err());
        #[cfg(feature = "tracing")]
        tracing::trace!(field = %kind, ?outcome, "field validated");
        outcome
    }

    /// Check every field in form order. Returns the failures in that order.
    pub fn validate_all(&self, doc: &mut Document) -> Vec<(FieldKind, FieldError)> {
        FieldKind::ALL
            .into_iter()
            .filter_map(|kind| self.validate_field(doc, kind).err().map(|e| (kind, e)))
            .collect()
    }

    /// Check every field and return the first that failed, in form order.
    pub fn first_invalid(&self, doc: &mut Document) -> Option<FieldKind> {
        self.validate_all(doc).first().map(|&(kind, _)| kind)
    }

    /// Validate everything, then either report and focus the first failure
    /// or clear the form and report success.
    ///
    /// The status region is emptied now and the outcome text is written by
    /// [`Controller::tick`] once the re-announce delay has passed.
    pub fn submit(&mut self, doc: &mut Document, now: Duration) -> SubmitOutcome {
        let failures = self.validate_all(doc);
        let outcome = match failures.first() {
            Some(&(first, _)) => {
                self.status.announce(doc, self.messages.text(STATUS_INVALID), now);
                doc.focus(self.slot(first).input);
                SubmitOutcome::Invalid {
                    first,
                    errors: failures.len(),
                }
            }
            None => {
                self.reset(doc);
                self.status.announce(doc, self.messages.text(STATUS_SENT), now);
                SubmitOutcome::Sent
            }
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(?outcome, "form submitted");
        outcome
    }

    /// Clear every value and error, and drop the status message.
    pub fn reset(&mut self, doc: &mut Document) {
        for kind in FieldKind::ALL {
            doc.set_value(self.slot(kind).input, "");
            self.render(doc, kind, None);
        }
        self.status.clear(doc);
    }

    fn render(&self, doc: &mut Document, kind: FieldKind, error: Option<FieldError>) {
        let slot = self.slot(kind);
        match error {
            Some(error) => {
                doc.set_attr(slot.input, "aria-invalid", "true");
                doc.set_text(slot.error, error.message(kind, &self.messages));
                doc.toggle_attr(slot.error, "hidden", false);
            }
            None => {
                doc.remove_attr(slot.input, "aria-invalid");
                doc.set_text(slot.error, "");
                doc.toggle_attr(slot.error, "hidden", true);
            }
        }
    }

    /// Blur validates the field; input never does.
    pub fn handle_blur(&self, doc: &mut Document, target: NodeId) -> EventResult {
        match self.field_for(target) {
            Some(kind) => {
                let _ = self.validate_field(doc, kind);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }
}

fn link_description(doc: &mut Document, input: NodeId, error_id: &str) {
    let current = doc.attr(input, "aria-describedby").unwrap_or("");
    if current.split_whitespace().any(|t| t == error_id) {
        return;
    }
    let linked = if current.trim().is_empty() {
        error_id.to_owned()
    } else {
        format!("{} {error_id}", current.trim())
    };
    doc.set_attr(input, "aria-describedby", linked);
}

impl Controller for FormValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handle_event(&mut self, doc: &mut Document, event: &Event, now: Duration) -> EventResult {
        match event {
            Event::Submit(target) if *target == self.form => {
                self.submit(doc, now);
                EventResult::PreventDefault
            }
            Event::Blur(target) => self.handle_blur(doc, *target),
            _ => EventResult::Ignored,
        }
    }

    fn tick(&mut self, doc: &mut Document, now: Duration) {
        self.status.tick(doc, now);
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.status.next_deadline()
    }
}
