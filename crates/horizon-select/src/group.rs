//! Groups of select widgets sharing one configuration.
//!
//! A [`SelectGroup`] takes every element of a [`Document`] matching its
//! selector and turns it into a [`SearchableSelect`]. Elements without
//! options are left unmanaged in local mode, since there is nothing to pick
//! from. A selector that matches nothing yields an inert group: every
//! operation is a no-op and `onLoaded` is never called.
//!
//! # Example
//!
//! ```
//! use horizon_select::{BackingControl, Document, SelectConfig, SelectGroup};
//!
//! let document = Document::new()
//!     .with_element(
//!         BackingControl::new("a")
//!             .with_class("picker")
//!             .with_option("1", "One")
//!             .with_option("2", "Two"),
//!     )
//!     .with_element(BackingControl::new("b").with_class("picker").with_option("x", "X"));
//!
//! let mut group = SelectGroup::builder()
//!     .selector(".picker")
//!     .config(SelectConfig::new())
//!     .build(document)
//!     .unwrap();
//!
//! group.set_value(&["2", "x"]);
//! assert_eq!(group.value(), vec!["2".to_string()]);
//! assert_eq!(group.get(1).unwrap().value(), "x");
//! ```

use std::sync::Arc;
use std::time::Instant;

use horizon_select_core::logging::targets;
use horizon_select_core::{SharedClock, SystemClock};
use horizon_select_net::NetworkError;
use serde_json::Value;

use crate::backing::BackingControl;
use crate::config::SelectConfig;
use crate::document::{Document, Selector};
use crate::dropdown::{DetachedDropdown, DropdownFactory, DropdownMenu};
use crate::error::Result;
use crate::fetch::{FetchTicket, PendingFetch};
use crate::select::SearchableSelect;

// ============================================================================
// Target
// ============================================================================

/// A matched element.
#[derive(Debug)]
pub enum Target {
    /// Replaced by a widget.
    Managed(Box<SearchableSelect>),
    /// Left alone; only its disabled flag follows the group.
    Unmanaged(BackingControl),
}

impl Target {
    /// The native element.
    pub fn backing(&self) -> &BackingControl {
        match self {
            Self::Managed(select) => select.backing(),
            Self::Unmanaged(backing) => backing,
        }
    }

    /// The widget, if managed.
    pub fn as_select(&self) -> Option<&SearchableSelect> {
        match self {
            Self::Managed(select) => Some(select.as_ref()),
            Self::Unmanaged(_) => None,
        }
    }

    /// The widget, if managed.
    pub fn as_select_mut(&mut self) -> Option<&mut SearchableSelect> {
        match self {
            Self::Managed(select) => Some(select.as_mut()),
            Self::Unmanaged(_) => None,
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        match self {
            Self::Managed(select) if enabled => select.enable(),
            Self::Managed(select) => select.disable(),
            Self::Unmanaged(backing) => backing.set_disabled(!enabled),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SelectGroup`].
pub struct SelectGroupBuilder {
    selector: Selector,
    config: SelectConfig,
    clock: SharedClock,
    dropdowns: Option<DropdownFactory>,
}

impl SelectGroupBuilder {
    fn new() -> Self {
        Self {
            selector: Selector::parse(None),
            config: SelectConfig::default(),
            clock: Arc::new(SystemClock),
            dropdowns: None,
        }
    }

    /// Set the selector; empty selects the default class.
    pub fn selector(mut self, selector: &str) -> Self {
        self.selector = Selector::parse(Some(selector));
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: SelectConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the clock driving debounce timers.
    ///
    /// When the group is driven by a [`SelectRuntime`](crate::SelectRuntime),
    /// this must follow tokio time, as [`TokioClock`](crate::TokioClock) does.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Set how dropdowns are created for each element.
    pub fn dropdown_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Box<dyn DropdownMenu> + Send + Sync + 'static,
    {
        self.dropdowns = Some(Arc::new(factory));
        self
    }

    /// Initialize every matching element of `document`.
    ///
    /// Fails only on an invalid configuration.
    pub fn build(self, mut document: Document) -> Result<SelectGroup> {
        self.config.validate()?;
        let config = Arc::new(self.config);

        let elements = document.take_matching(&self.selector);
        if elements.is_empty() {
            tracing::error!(
                target: targets::GROUP,
                selector = %self.selector,
                "no elements matched, nothing initialized"
            );
            return Ok(SelectGroup {
                targets: Vec::new(),
                config,
            });
        }

        let dropdowns: DropdownFactory = self.dropdowns.unwrap_or_else(|| Arc::new(detached_dropdown));

        let mut members: Vec<Target> = elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                if !config.is_remote() && !element.has_options() {
                    tracing::debug!(target: targets::GROUP, id = %element.id(), "element has no options, left unmanaged");
                    return Target::Unmanaged(element);
                }
                let dropdown = dropdowns(element.id());
                let select = SearchableSelect::new(
                    index,
                    element,
                    Arc::clone(&config),
                    Arc::clone(&self.clock),
                    dropdown,
                );
                if let Some(on_change) = config.on_change.clone() {
                    select.value_changed.connect(move |value| on_change(value.as_str()));
                }
                Target::Managed(Box::new(select))
            })
            .collect();

        for select in members.iter_mut().filter_map(Target::as_select_mut) {
            select.finish_init();
        }

        let group = SelectGroup {
            targets: members,
            config,
        };
        tracing::info!(
            target: targets::GROUP,
            selector = %self.selector,
            managed = group.managed_count(),
            total = group.len(),
            "select group initialized"
        );

        if let Some(on_loaded) = &group.config.on_loaded {
            on_loaded();
        }
        Ok(group)
    }
}

fn detached_dropdown(_id: &str) -> Box<dyn DropdownMenu> {
    Box::new(DetachedDropdown::new())
}

impl std::fmt::Debug for SelectGroupBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectGroupBuilder")
            .field("selector", &self.selector)
            .field("config", &self.config)
            .field("dropdowns", &self.dropdowns.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Group
// ============================================================================

/// Every select widget created from one selector and configuration.
#[derive(Debug)]
pub struct SelectGroup {
    targets: Vec<Target>,
    config: Arc<SelectConfig>,
}

impl SelectGroup {
    /// Start building a group.
    pub fn builder() -> SelectGroupBuilder {
        SelectGroupBuilder::new()
    }

    /// The shared configuration.
    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Matched elements, in document order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Number of matched elements.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Whether the selector matched nothing.
    pub fn is_inert(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of elements replaced by widgets.
    pub fn managed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.as_select().is_some()).count()
    }

    /// The widget for the element at `index`.
    pub fn get(&self, index: usize) -> Option<&SearchableSelect> {
        self.targets.get(index).and_then(Target::as_select)
    }

    /// The widget for the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut SearchableSelect> {
        self.targets.get_mut(index).and_then(Target::as_select_mut)
    }

    /// Every widget, in document order.
    pub fn selects(&self) -> impl Iterator<Item = &SearchableSelect> {
        self.targets.iter().filter_map(Target::as_select)
    }

    fn selects_mut(&mut self) -> impl Iterator<Item = &mut SearchableSelect> {
        self.targets.iter_mut().filter_map(Target::as_select_mut)
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// The value of the first element, as a one-element list.
    pub fn value(&self) -> Vec<String> {
        let first = self
            .targets
            .first()
            .map(|target| target.backing().value().to_string())
            .unwrap_or_default();
        vec![first]
    }

    /// Set values by position.
    ///
    /// Each widget takes the entry at its position; a missing or empty entry
    /// and an unknown value both unselect. Selecting a different item
    /// notifies `onChange`.
    pub fn set_value<S: AsRef<str>>(&mut self, values: &[S]) {
        for (index, target) in self.targets.iter_mut().enumerate() {
            let desired = values.get(index).map_or("", AsRef::as_ref);
            if let Some(select) = target.as_select_mut() {
                select.select_value(desired);
            }
        }
    }

    /// Enable every element.
    pub fn enable(&mut self) {
        for target in &mut self.targets {
            target.set_enabled(true);
        }
    }

    /// Disable every element. Values are kept.
    pub fn disable(&mut self) {
        for target in &mut self.targets {
            target.set_enabled(false);
        }
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Requests queued by every widget.
    pub fn take_pending_fetches(&mut self) -> Vec<PendingFetch> {
        self.selects_mut()
            .flat_map(SearchableSelect::take_pending_fetches)
            .collect()
    }

    /// Route a fetch outcome to the widget that issued it.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: std::result::Result<Value, NetworkError>) {
        match self.get_mut(ticket.target) {
            Some(select) => select.complete_fetch(ticket, result),
            None => {
                tracing::warn!(target: targets::GROUP, target_index = ticket.target, "completion for unknown target");
            }
        }
    }

    /// Fire due debounce timers. Returns how many fired.
    pub fn poll_timers(&mut self) -> usize {
        self.selects_mut()
            .map(SearchableSelect::poll_timers)
            .filter(|&fired| fired)
            .count()
    }

    /// The earliest pending debounce deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.selects().filter_map(SearchableSelect::next_deadline).min()
    }
}
