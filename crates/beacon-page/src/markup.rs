#![forbid(unsafe_code)]

//! The demo page markup.
//!
//! Builds a [`Document`] carrying every id the controllers bind to, taken
//! from the [`PageConfig`] id sets, so markup and wiring cannot drift apart.
//!
//! | Region | Contents |
//! |--------|----------|
//! | Header landmark | skip link, title, primary navigation |
//! | Main landmark | dialog trigger, contact form, language table |
//! | Footer landmark | credits |
//! | Overlay | dialog panel, hidden until opened |

use beacon_core::{Document, NodeId};

use crate::config::PageConfig;

/// Column labels of the language table.
pub const TABLE_COLUMNS: [&str; 3] = ["Language", "First released", "Survey rank"];

/// Rows of the language table, one entry per column.
pub const TABLE_ROWS: &[[&str; 3]] = &[
    ["Rust", "2015", "14"],
    ["Python", "1991", "1"],
    ["Haskell", "1990", "30"],
    ["Go", "2012", "12"],
    ["Elm", "2012", "48"],
    ["Ada", "1980", "40"],
    ["C", "1972", "5"],
];

/// Build the complete page for `config`.
#[must_use]
pub fn build(config: &PageConfig) -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    let landmarks = &config.dialog_ids.landmarks;

    let header = landmark(&mut doc, body, "header", landmarks.first());
    build_header(&mut doc, header);

    let main = landmark(&mut doc, body, "main", landmarks.get(1));
    build_dialog_section(&mut doc, main, config);
    build_form_section(&mut doc, main, config);
    build_table_section(&mut doc, main, config);

    let footer = landmark(&mut doc, body, "footer", landmarks.get(2));
    doc.element("p")
        .text("Beacon demo page. Keyboard and screen reader friendly.")
        .append_to(footer);

    build_dialog(&mut doc, body, config);
    doc
}

fn landmark(doc: &mut Document, parent: NodeId, tag: &str, id: Option<&String>) -> NodeId {
    let builder = doc.element(tag);
    match id {
        Some(id) => builder.id(id).append_to(parent),
        None => builder.append_to(parent),
    }
}

fn build_header(doc: &mut Document, header: NodeId) {
    doc.element("a")
        .class("skip-link")
        .attr("href", "#main-content")
        .text("Skip to main content")
        .append_to(header);
    doc.element("h1")
        .text("Beacon accessibility demo")
        .append_to(header);
    let nav = doc
        .element("nav")
        .attr("aria-label", "Primary")
        .append_to(header);
    for (href, label) in [
        ("#dialog-section", "Dialog"),
        ("#form-section", "Contact form"),
        ("#table-section", "Sortable table"),
    ] {
        doc.element("a").attr("href", href).text(label).append_to(nav);
    }
}

fn build_dialog_section(doc: &mut Document, main: NodeId, config: &PageConfig) {
    let section = doc
        .element("section")
        .id("dialog-section")
        .attr("aria-labelledby", "dialog-section-heading")
        .append_to(main);
    doc.element("h2")
        .id("dialog-section-heading")
        .text("Modal dialog")
        .append_to(section);
    doc.element("p")
        .text("The dialog keeps keyboard focus inside until it is closed.")
        .append_to(section);
    for (i, id) in config.dialog_ids.open_triggers.iter().enumerate() {
        let label = if i == 0 {
            "Subscribe to updates".to_owned()
        } else {
            format!("Open dialog {}", i + 1)
        };
        doc.element("button")
            .id(id)
            .attr("type", "button")
            .attr("aria-haspopup", "dialog")
            .text(&label)
            .append_to(section);
    }
}

fn build_form_section(doc: &mut Document, main: NodeId, config: &PageConfig) {
    let ids = &config.form_ids;
    let section = doc
        .element("section")
        .id("form-section")
        .attr("aria-labelledby", "form-heading")
        .append_to(main);
    doc.element("h2")
        .id("form-heading")
        .text("Contact us")
        .append_to(section);
    let form = doc
        .element("form")
        .id(&ids.form)
        .attr("novalidate", "")
        .append_to(section);

    let fields = [
        (&ids.name, "Name", "input", Some("text"), "name"),
        (&ids.email, "Email", "input", Some("email"), "email"),
        (&ids.message, "Message", "textarea", None, "off"),
    ];
    for (field, label, tag, kind, autocomplete) in fields {
        let group = doc.element("div").class("field").append_to(form);
        doc.element("label")
            .attr("for", &field.input)
            .text(label)
            .append_to(group);
        let mut input = doc
            .element(tag)
            .id(&field.input)
            .attr("name", &field.input)
            .attr("aria-required", "true")
            .attr("autocomplete", autocomplete);
        if let Some(kind) = kind {
            input = input.attr("type", kind);
        }
        input.append_to(group);
        doc.element("p")
            .id(&field.error)
            .class("field-error")
            .attr("aria-live", "polite")
            .attr("hidden", "")
            .append_to(group);
    }
    doc.element("button")
        .id("send-message")
        .attr("type", "submit")
        .text("Send message")
        .append_to(form);
    doc.element("div")
        .id(&ids.status)
        .attr("role", "status")
        .attr("aria-live", "polite")
        .append_to(form);
}

fn build_table_section(doc: &mut Document, main: NodeId, config: &PageConfig) {
    let ids = &config.table_ids;
    let section = doc
        .element("section")
        .id("table-section")
        .attr("aria-labelledby", "table-heading")
        .append_to(main);
    doc.element("h2")
        .id("table-heading")
        .text("Programming languages")
        .append_to(section);
    doc.element("p")
        .id(&ids.live_region)
        .class("visually-hidden")
        .attr("role", "status")
        .attr("aria-live", "polite")
        .attr("aria-atomic", "true")
        .append_to(section);
    let table = doc.element("table").id("data-table").append_to(section);
    doc.element("caption")
        .text("Languages by release year and survey rank. Column headers are sort buttons.")
        .append_to(table);
    let thead = doc.element("thead").append_to(table);
    let head_row = doc.element("tr").append_to(thead);
    for (i, (header_id, trigger_id)) in ids.headers.iter().zip(&ids.triggers).enumerate() {
        let label = TABLE_COLUMNS
            .get(i)
            .map_or_else(|| format!("Column {}", i + 1), |l| (*l).to_owned());
        let th = doc
            .element("th")
            .id(header_id)
            .attr("scope", "col")
            .attr("aria-sort", "none")
            .append_to(head_row);
        let button = doc
            .element("button")
            .id(trigger_id)
            .attr("type", "button")
            .text(&label)
            .append_to(th);
        doc.element("span")
            .class("sort-icon")
            .attr("aria-hidden", "true")
            .text("↕")
            .append_to(button);
    }
    let tbody = doc.element("tbody").id(&ids.body).append_to(table);
    for row in TABLE_ROWS {
        let tr = doc.element("tr").append_to(tbody);
        for (i, cell) in row.iter().enumerate() {
            let tag = if i == 0 { "th" } else { "td" };
            let builder = doc.element(tag).text(cell);
            let builder = if i == 0 { builder.attr("scope", "row") } else { builder };
            builder.append_to(tr);
        }
    }
}

fn build_dialog(doc: &mut Document, body: NodeId, config: &PageConfig) {
    let ids = &config.dialog_ids;
    let overlay = doc
        .element("div")
        .id(&ids.overlay)
        .class("modal-overlay")
        .attr("hidden", "")
        .attr("aria-hidden", "true")
        .append_to(body);
    let panel = doc
        .element("div")
        .id(&ids.panel)
        .class("modal")
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .attr("aria-labelledby", "dialog-title")
        .attr("aria-describedby", "dialog-description")
        .attr("tabindex", "-1")
        .append_to(overlay);
    doc.element("h2")
        .id("dialog-title")
        .text("Subscribe to updates")
        .append_to(panel);
    doc.element("p")
        .id("dialog-description")
        .text("Get an email when new accessibility examples are published.")
        .append_to(panel);
    doc.element("label")
        .attr("for", "dialog-email")
        .text("Email address")
        .append_to(panel);
    doc.element("input")
        .id("dialog-email")
        .attr("type", "email")
        .attr("autocomplete", "email")
        .append_to(panel);
    for (i, id) in ids.close_controls.iter().enumerate() {
        let label = if i == 0 { "Subscribe" } else { "Cancel" };
        doc.element("button")
            .id(id)
            .attr("type", "button")
            .text(label)
            .append_to(panel);
    }
}
