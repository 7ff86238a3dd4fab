#![forbid(unsafe_code)]

use std::time::Duration;

use beacon_core::{Document, Event, EventResult, NodeId};
use beacon_i18n::Collator;

use super::sort::{CellKey, SortDirection, SortState, sort_order};
use crate::live_region::{Announcer, AnnouncerConfig};
use crate::messages::{Messages, TABLE_SORTED};
use crate::{Controller, WireError, require, require_all};

const NAME: &str = "table";

/// Element ids the table sorter binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIds {
    /// The `tbody` whose `tr` children are reordered.
    pub body: String,
    /// Column headers (`th`), carrying `aria-sort`.
    pub headers: Vec<String>,
    /// Sort buttons, one per header.
    pub triggers: Vec<String>,
    /// Live region for sort announcements.
    pub live_region: String,
}

impl TableIds {
    /// Conventional ids for a table with `columns` sortable columns.
    #[must_use]
    pub fn with_columns(columns: usize) -> Self {
        Self {
            body: "data-table-body".into(),
            headers: (0..columns).map(|i| format!("sort-header-{i}")).collect(),
            triggers: (0..columns).map(|i| format!("sort-button-{i}")).collect(),
            live_region: "sort-status".into(),
        }
    }
}

impl Default for TableIds {
    fn default() -> Self {
        Self::with_columns(3)
    }
}

/// Sortable data table.
#[derive(Debug, Clone)]
pub struct TableSorter {
    body: NodeId,
    headers: Vec<NodeId>,
    triggers: Vec<NodeId>,
    state: SortState,
    announcer: Announcer,
    collator: Collator,
    messages: Messages,
}

impl TableSorter {
    /// Bind to the table markup. Every header starts at `aria-sort="none"`.
    pub fn attach(
        doc: &mut Document,
        ids: &TableIds,
        announcer: AnnouncerConfig,
        messages: Messages,
    ) -> Result<Self, WireError> {
        if ids.headers.len() != ids.triggers.len() {
            return Err(WireError::ColumnMismatch {
                headers: ids.headers.len(),
                triggers: ids.triggers.len(),
            });
        }
        let body = require(doc, NAME, &ids.body)?;
        let headers = require_all(doc, NAME, &ids.headers)?;
        let triggers = require_all(doc, NAME, &ids.triggers)?;
        let region = require(doc, NAME, &ids.live_region)?;

        let sorter = Self {
            body,
            headers,
            triggers,
            state: SortState::new(),
            announcer: Announcer::new(region, announcer),
            collator: Collator::new(),
            messages,
        };
        sorter.render_headers(doc);
        Ok(sorter)
    }

    #[must_use]
    pub fn state(&self) -> SortState {
        self.state
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn header(&self, column: usize) -> Option<NodeId> {
        self.headers.get(column).copied()
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    #[must_use]
    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    /// Rows of the table body in their current order.
    #[must_use]
    pub fn rows(&self, doc: &Document) -> Vec<NodeId> {
        doc.children_by_tag(self.body, "tr")
    }

    /// Trimmed text of the cell in `column` of `row`; empty when missing.
    #[must_use]
    pub fn cell_text(doc: &Document, row: NodeId, column: usize) -> String {
        doc.children(row)
            .iter()
            .copied()
            .filter(|&c| matches!(doc.tag(c), "td" | "th"))
            .nth(column)
            .map(|cell| doc.text_content(cell).trim().to_owned())
            .unwrap_or_default()
    }

    /// Sort by `column`, flipping direction when it is already active.
    ///
    /// Reorders whole rows, updates every header's `aria-sort`, and queues
    /// the announcement. Returns `None` for a column that does not exist.
    pub fn sort(&mut self, doc: &mut Document, column: usize, now: Duration) -> Option<SortDirection> {
        let header = self.header(column)?;
        let direction = self.state.advance(column);

        let rows = self.rows(doc);
        let keys: Vec<CellKey> = rows
            .iter()
            .map(|&row| CellKey::parse(&Self::cell_text(doc, row, column)))
            .collect();
        let mut order: Vec<NodeId> = sort_order(&keys, direction, &self.collator)
            .into_iter()
            .map(|i| rows[i])
            .collect();
        order.extend(
            doc.children(self.body)
                .iter()
                .copied()
                .filter(|c| !rows.contains(c)),
        );
        if let Err(_err) = doc.reorder_children(self.body, &order) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "row reorder rejected");
        }

        self.render_headers(doc);

        let label = doc.accessible_text(header);
        let direction_word = self.messages.text(direction.message_key());
        let message = self.messages.format(
            TABLE_SORTED,
            &[("column", label.as_str()), ("direction", direction_word.as_str())],
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(column, %direction, rows = rows.len(), "table sorted");
        self.announcer.announce(doc, message, now);
        Some(direction)
    }

    fn render_headers(&self, doc: &mut Document) {
        for &header in &self.headers {
            doc.set_attr(header, "aria-sort", "none");
        }
        if let Some(column) = self.state.column()
            && let Some(&active) = self.headers.get(column)
        {
            doc.set_attr(active, "aria-sort", self.state.direction().aria_value());
        }
    }

    /// Sort when a click lands on or inside a sort trigger.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId, now: Duration) -> EventResult {
        let Some(column) = self
            .triggers
            .iter()
            .position(|&t| doc.contains(t, target))
        else {
            return EventResult::Ignored;
        };
        self.sort(doc, column, now);
        EventResult::Consumed
    }
}

impl Controller for TableSorter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handle_event(&mut self, doc: &mut Document, event: &Event, now: Duration) -> EventResult {
        match event {
            Event::Click(target) => self.handle_click(doc, *target, now),
            _ => EventResult::Ignored,
        }
    }

    fn tick(&mut self, doc: &mut Document, now: Duration) {
        self.announcer.tick(doc, now);
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.announcer.next_deadline()
    }
}
