#![forbid(unsafe_code)]

//! The Beacon accessibility demo page.
//!
//! [`Page`] builds the demo markup, attaches the dialog, form and table
//! controllers, and plays the part of the browser: it routes host events,
//! performs default actions such as Tab navigation, and keeps the clock that
//! drives delayed live-region updates.
//!
//! ```
//! use beacon_core::{Event, KeyCode, KeyEvent};
//! use beacon_page::{Page, PageConfig};
//!
//! let mut page = Page::new(PageConfig::default());
//! let trigger = page.element("open-dialog").unwrap();
//! page.dispatch(Event::Click(trigger));
//! assert!(page.dialog().unwrap().is_open());
//!
//! page.dispatch(Event::Key(KeyEvent::new(KeyCode::Escape)));
//! assert_eq!(page.document().focused(), Some(trigger));
//! ```

pub mod config;
pub mod markup;
pub mod page;

pub use config::PageConfig;
pub use page::{Page, PageSnapshot, SortSnapshot};
