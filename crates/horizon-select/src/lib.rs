//! Horizon Select: a searchable, remotely-loadable select widget engine.
//!
//! Each managed native select element becomes a [`SearchableSelect`]: a
//! button showing the current label, a dropdown panel listing the items,
//! and an optional search box. The engine keeps the native element, the
//! panel and the button in sync; drawing them is up to the host.
//!
//! - **Local mode**: the element's own options are the items; typing filters
//!   them, ignoring whitespace and (optionally) case.
//! - **Remote mode**: with an [`AjaxConfig`], typing is debounced and sent
//!   to an endpoint. Responses in any common shape are normalized into
//!   [`OptionRecord`]s, deduplicated, capped and rendered with the current
//!   selection pinned on top.
//! - **Prefetch by value**: a preset value in remote mode is resolved to its
//!   label before the user opens the dropdown.
//!
//! # Local Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use horizon_select::{BackingControl, Document, SelectConfig, SelectGroup};
//!
//! let changes = Arc::new(Mutex::new(Vec::new()));
//! let sink = changes.clone();
//!
//! let document = Document::new().with_element(
//!     BackingControl::new("size")
//!         .with_class("horizon-select")
//!         .with_option("s", "Small")
//!         .with_option("m", "Medium")
//!         .with_option("l", "Large"),
//! );
//! let mut group = SelectGroup::builder()
//!     .config(SelectConfig::new().with_on_change(move |v| sink.lock().push(v.to_string())))
//!     .build(document)
//!     .unwrap();
//!
//! let select = group.get_mut(0).unwrap();
//! select.open();
//! select.click_value("m");
//! assert_eq!(select.button().label(), "Medium");
//! assert_eq!(*changes.lock(), vec!["m".to_string()]);
//! ```
//!
//! # Remote Mode
//!
//! Remote widgets queue their requests instead of sending them. Drive a
//! group with a [`SelectRuntime`] over an
//! [`HttpClient`](horizon_select_net::HttpClient), or execute the
//! [`PendingFetch`]es yourself and hand the bodies back with
//! [`SelectGroup::complete_fetch`]:
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_select::{AjaxConfig, BackingControl, Document, SelectConfig, SelectGroup};
//! use horizon_select_core::ManualClock;
//! use serde_json::json;
//!
//! let clock = ManualClock::new();
//! let mut group = SelectGroup::builder()
//!     .clock(Arc::new(clock.clone()))
//!     .config(SelectConfig::new().with_ajax(AjaxConfig::new("/api/cities")))
//!     .build(Document::new().with_element(BackingControl::new("city").with_class("horizon-select")))
//!     .unwrap();
//!
//! group.get_mut(0).unwrap().set_search_text("ber");
//! clock.advance(Duration::from_millis(250));
//! group.poll_timers();
//!
//! let fetch = group.take_pending_fetches().remove(0);
//! assert_eq!(fetch.request.full_url(), "/api/cities?q=ber&length=25&start=0");
//!
//! group.complete_fetch(fetch.ticket, Ok(json!([{"id": 1, "label": "Berlin"}, "Bern"])));
//! let texts: Vec<_> = group.get(0).unwrap().panel().items().iter().map(|i| i.text.clone()).collect();
//! assert_eq!(texts, vec!["Berlin", "Bern"]);
//! ```
//!
//! # Configuration
//!
//! [`SelectConfig`] loads from JSON or TOML with camelCase keys; see the
//! [`config`] module.
//!
//! # Logging
//!
//! Everything is logged through `tracing` under the targets listed in
//! [`horizon_select_core::logging::targets`].

pub mod backing;
pub mod config;
pub mod document;
pub mod dropdown;
mod error;
pub mod fetch;
pub mod filter;
pub mod group;
pub mod mapper;
pub mod normalize;
pub mod option;
pub mod panel;
pub mod reconcile;
pub mod request;
mod runtime;
mod select;
mod selection;

pub use backing::{BackingControl, DEFAULT_VALUE_ATTRIBUTE};
pub use config::{AjaxConfig, ChangeCallback, Language, LoadedCallback, SelectConfig};
pub use document::{DEFAULT_CLASS, Document, Selector};
pub use dropdown::{DetachedDropdown, DropdownFactory, DropdownMenu};
pub use error::{MapperError, Result, SelectError};
pub use fetch::{FetchKind, FetchState, FetchTicket, PendingFetch};
pub use filter::FilterOptions;
pub use group::{SelectGroup, SelectGroupBuilder, Target};
pub use mapper::{MapperResult, RequestContext, RequestMapper, RequestOverrides, ResponseMapper};
pub use option::OptionRecord;
pub use panel::{ItemPanel, PanelItem, PanelStatus, SelectButton, StatusKind};
pub use reconcile::{RenderBatch, reconcile};
pub use runtime::{SelectRuntime, TokioClock};
pub use select::SearchableSelect;
