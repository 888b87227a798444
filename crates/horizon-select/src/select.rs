//! The searchable select widget.
//!
//! A [`SearchableSelect`] replaces one native select element with a button
//! and a dropdown panel. In local mode the panel shows the element's own
//! options and filters them as the user types. In remote mode the options
//! come from an HTTP endpoint: keystrokes are debounced, requests are queued
//! for a driver, and responses are reconciled into the panel and mirrored
//! back into the native element.
//!
//! Instances are created by a [`SelectGroup`](crate::SelectGroup).
//!
//! # Example
//!
//! ```
//! use horizon_select::{BackingControl, Document, SelectConfig, SelectGroup};
//!
//! let document = Document::new().with_element(
//!     BackingControl::new("fruit")
//!         .with_class("horizon-select")
//!         .with_option("1", "Apple")
//!         .with_option("2", "Banana"),
//! );
//!
//! let mut group = SelectGroup::builder()
//!     .config(SelectConfig::new().with_live_search(true).with_default_value("2"))
//!     .build(document)
//!     .unwrap();
//!
//! let select = group.get_mut(0).unwrap();
//! assert_eq!(select.button().label(), "Banana");
//!
//! select.set_search_text("app");
//! let visible: Vec<_> = select.panel().visible_items().map(|i| i.text.as_str()).collect();
//! assert_eq!(visible, vec!["Apple", "Banana"]);
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_select_core::logging::targets;
use horizon_select_core::{Debouncer, SharedClock, Signal};

use crate::backing::BackingControl;
use crate::config::{DEFAULT_DEBOUNCE, SelectConfig};
use crate::dropdown::DropdownMenu;
use crate::fetch::{FetchState, PendingFetch, PrefetchTicket};
use crate::panel::{ItemPanel, PanelItem, SelectButton};

/// A searchable, optionally remote select widget.
pub struct SearchableSelect {
    pub(crate) index: usize,
    pub(crate) config: Arc<SelectConfig>,
    pub(crate) backing: BackingControl,
    pub(crate) button: SelectButton,
    pub(crate) panel: ItemPanel,
    pub(crate) dropdown: Box<dyn DropdownMenu>,
    pub(crate) clock: SharedClock,
    pub(crate) debouncer: Debouncer<()>,
    pub(crate) fetch_state: FetchState,
    pub(crate) next_seq: u64,
    pub(crate) awaiting: Option<u64>,
    pub(crate) prefetch: Option<PrefetchTicket>,
    pub(crate) selection_epoch: u64,
    pub(crate) outbox: Vec<PendingFetch>,
    pub(crate) initialized: bool,

    /// Emitted with the new value after each user-driven selection.
    pub value_changed: Signal<String>,
}

impl SearchableSelect {
    pub(crate) fn new(
        index: usize,
        backing: BackingControl,
        config: Arc<SelectConfig>,
        clock: SharedClock,
        dropdown: Box<dyn DropdownMenu>,
    ) -> Self {
        let remote = config.is_remote();
        let native_label = match backing.value() {
            "" => None,
            _ => backing.selected_option().map(|option| option.text.clone()),
        };
        let showing_placeholder = native_label.is_none();
        let label = native_label.unwrap_or_else(|| config.language.select_placeholder.clone());

        let mut panel = ItemPanel::new(
            config.live_search || remote,
            config.language.search_placeholder.clone(),
        );
        panel.set_items(backing.options().iter().map(PanelItem::from_record).collect());

        let delay = config
            .ajax
            .as_ref()
            .map_or(DEFAULT_DEBOUNCE, |ajax| ajax.debounce_delay());

        let mut select = Self {
            index,
            button: SelectButton::new(backing.id(), label, config.button_classes()),
            backing,
            panel,
            dropdown,
            clock,
            debouncer: Debouncer::new(delay),
            fetch_state: FetchState::Idle,
            next_seq: 0,
            awaiting: None,
            prefetch: None,
            selection_epoch: 0,
            outbox: Vec::new(),
            initialized: false,
            value_changed: Signal::new(),
            config,
        };

        if select.config.disabled || select.backing.is_disabled() {
            select.button.set_disabled(true);
        }

        if remote {
            select.button.set_muted(showing_placeholder);
            select.init_remote();
        } else {
            select.refilter("");
            select.initial_selection();
        }

        tracing::debug!(
            target: targets::GROUP,
            id = %select.backing.id(),
            remote,
            value = %select.backing.value(),
            "select initialized"
        );
        select
    }

    fn init_remote(&mut self) {
        let value = self.backing.value().to_string();
        if self.config.show_active && !value.is_empty() {
            if let Some(item) = self
                .panel
                .items_mut()
                .iter_mut()
                .find(|item| item.value == value)
            {
                item.active = true;
            }
        }

        let desired = self.desired_value();
        if !desired.is_empty() {
            self.start_prefetch(desired);
        }
    }

    pub(crate) fn finish_init(&mut self) {
        self.initialized = true;
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Position of this instance in its group.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The shared configuration.
    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// The native element.
    pub fn backing(&self) -> &BackingControl {
        &self.backing
    }

    /// The current value; empty when unselected.
    pub fn value(&self) -> &str {
        self.backing.value()
    }

    /// The button.
    pub fn button(&self) -> &SelectButton {
        &self.button
    }

    /// The dropdown panel.
    pub fn panel(&self) -> &ItemPanel {
        &self.panel
    }

    /// Where the remote load cycle stands.
    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    /// Whether options are loaded remotely.
    pub fn is_remote(&self) -> bool {
        self.config.is_remote()
    }

    /// Whether clicks are ignored.
    pub fn is_disabled(&self) -> bool {
        self.button.is_disabled()
    }

    /// Whether the owning group finished initializing.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the panel should scroll.
    pub fn is_scrollable(&self) -> bool {
        self.panel
            .is_scrollable(self.config.scroll_list, self.config.scroll_items)
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// The user clicked the button.
    ///
    /// Opens the dropdown. Remote instances then show an input hint, load
    /// results straight away when `initialLoad` is set, or leave the panel
    /// as it is. Local instances re-filter with the current search text.
    pub fn open(&mut self) {
        if self.is_disabled() {
            tracing::trace!(target: targets::SELECTION, id = %self.backing.id(), "open ignored, disabled");
            return;
        }
        self.dropdown.show();

        let Some(ajax) = self.config.ajax.as_ref() else {
            let term = self.panel.search_text().to_string();
            self.refilter(&term);
            return;
        };

        let initial_load = ajax.initial_load;
        let term = self.panel.search_text().to_string();
        let length = term.chars().count();
        let minimum = self.minimum_input_length();

        if length < minimum {
            let hint = self.input_hint(length);
            self.show_hint(hint);
        } else if initial_load {
            self.load(&term);
        } else if minimum == 0 && term.is_empty() && self.panel.items().is_empty() {
            let hint = self.input_hint(0);
            self.show_hint(hint);
        }
    }

    /// The user typed into the search box.
    ///
    /// Remote instances restart the debounce timer; local instances with
    /// live search filter at once.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.panel.set_search_text(text.clone());

        if self.is_remote() {
            let now = self.clock.now();
            self.debouncer.trigger(now, ());
            self.fetch_state = FetchState::Debouncing;
        } else if self.config.live_search {
            self.refilter(&text);
        }
    }

    /// The user clicked the item at `index`.
    pub fn click_item(&mut self, index: usize) {
        if self.is_disabled() {
            tracing::trace!(target: targets::SELECTION, id = %self.backing.id(), "click ignored, disabled");
            return;
        }
        self.activate(index, true);
    }

    /// The user clicked the first item with `value`.
    ///
    /// Returns `false` if no item has that value.
    pub fn click_value(&mut self, value: &str) -> bool {
        match self.panel.position(value) {
            Some(index) => {
                self.click_item(index);
                true
            }
            None => false,
        }
    }

    /// Accept clicks again.
    pub fn enable(&mut self) {
        self.button.set_disabled(false);
        self.backing.set_disabled(false);
    }

    /// Ignore clicks. The value is kept.
    pub fn disable(&mut self) {
        self.button.set_disabled(true);
        self.backing.set_disabled(true);
    }
}

impl fmt::Debug for SearchableSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchableSelect")
            .field("index", &self.index)
            .field("backing", &self.backing)
            .field("button", &self.button)
            .field("panel", &self.panel)
            .field("fetch_state", &self.fetch_state)
            .field("awaiting", &self.awaiting)
            .field("pending_fetches", &self.outbox.len())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
