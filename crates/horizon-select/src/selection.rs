//! Selection state transitions.
//!
//! An instance is either unselected (empty backing value, muted placeholder
//! label) or selected (one item carries the active marker and the backing
//! value is its value). Selecting the active item again unselects it.

use horizon_select_core::logging::targets;

use crate::filter::FilterOptions;
use crate::panel::{PanelStatus, StatusKind};
use crate::select::SearchableSelect;

impl SearchableSelect {
    /// Return to the unselected state.
    ///
    /// Never notifies `value_changed`. Calling it twice leaves the same
    /// state as calling it once.
    pub fn reset(&mut self) {
        self.panel.clear_active();
        self.panel.set_search_text("");
        let placeholder = self.config.language.select_placeholder.clone();
        self.button.set_label(placeholder);
        self.button.set_muted(true);
        self.backing.set_value("");
        self.refilter("");
        self.selection_epoch += 1;
        tracing::debug!(target: targets::SELECTION, id = %self.backing.id(), "selection reset");
    }

    /// Select the item at `index`, or unselect if it is already active.
    ///
    /// `notify` controls whether `value_changed` is emitted; it never is
    /// before the owning group finished initializing.
    pub(crate) fn activate(&mut self, index: usize, notify: bool) {
        let Some(item) = self.panel.items().get(index).cloned() else {
            return;
        };
        if item.active {
            self.reset();
            return;
        }

        self.panel.clear_active();
        if let Some(target) = self.panel.items_mut().get_mut(index) {
            target.active = true;
        }
        self.button.set_label(item.text.clone());
        self.button.set_muted(false);
        self.backing.set_value(item.value.clone());
        self.panel.set_search_text("");
        self.refilter("");
        self.dropdown.hide();
        self.selection_epoch += 1;

        tracing::debug!(target: targets::SELECTION, id = %self.backing.id(), value = %item.value, "item selected");
        if notify && self.initialized {
            self.value_changed.emit(item.value);
        }
    }

    /// Move to `value`: empty or unknown values unselect, an already
    /// selected value is left alone.
    pub fn select_value(&mut self, value: &str) {
        if value.is_empty() {
            self.reset();
            return;
        }
        match self.panel.position(value) {
            Some(index) if self.panel.items()[index].active => {}
            Some(index) => self.activate(index, true),
            None => {
                tracing::debug!(target: targets::SELECTION, id = %self.backing.id(), %value, "unknown value, resetting");
                self.reset();
            }
        }
    }

    /// Re-run the filter with `term` and return the visible item count.
    pub(crate) fn refilter(&mut self, term: &str) -> usize {
        let options = FilterOptions::from(self.config.as_ref());
        let visible = options.apply(self.panel.items_mut(), term);
        self.panel.set_has_visible_content(visible > 0);

        if !self.config.is_remote() {
            let status = (visible == 0).then(|| {
                PanelStatus::new(StatusKind::NoResults, self.config.language.no_results_text())
            });
            self.panel.set_status(status);
        }
        visible
    }

    /// Pick the startup selection of a local instance.
    ///
    /// The configured default wins over the declarative attribute, which
    /// wins over the native selection.
    pub(crate) fn initial_selection(&mut self) {
        if self.config.no_default_selection {
            self.reset();
            return;
        }

        let desired = self.desired_value();
        if let Some(index) = (!desired.is_empty())
            .then(|| self.panel.position(&desired))
            .flatten()
        {
            self.activate(index, true);
            return;
        }

        let native = self.backing.value().to_string();
        if let Some(index) = (!native.is_empty())
            .then(|| self.panel.position(&native))
            .flatten()
        {
            self.activate(index, true);
            return;
        }

        self.reset();
    }

    /// The configured default value, else the declarative attribute.
    pub(crate) fn desired_value(&self) -> String {
        self.config
            .default_value
            .clone()
            .or_else(|| self.backing.default_value_attr().map(str::to_string))
            .unwrap_or_default()
    }
}
