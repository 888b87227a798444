//! Local item filtering.
//!
//! Matching ignores all whitespace, and case too unless configured
//! otherwise. An empty term shows everything only when `show_all` is on; the
//! active item stays visible whenever `show_active` is on.

use crate::config::SelectConfig;
use crate::panel::PanelItem;

/// The options that affect visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Compare case-sensitively.
    pub case_sensitive: bool,
    /// Show everything while the term is empty.
    pub show_all: bool,
    /// Keep the active item visible.
    pub show_active: bool,
}

impl From<&SelectConfig> for FilterOptions {
    fn from(config: &SelectConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            show_all: config.show_all,
            show_active: config.show_active,
        }
    }
}

impl FilterOptions {
    fn fold(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }

    /// Whether an item with `text` is visible for `term`.
    pub fn is_visible(&self, text: &str, term: &str, active: bool) -> bool {
        let term = self.fold(term);
        if term.is_empty() && !self.show_all {
            return false;
        }
        let needle = strip_whitespace(&term);
        strip_whitespace(&self.fold(text)).contains(&needle) || (self.show_active && active)
    }

    /// Update visibility of every item and return how many are visible.
    pub fn apply(&self, items: &mut [PanelItem], term: &str) -> usize {
        let mut visible = 0;
        for item in items.iter_mut() {
            item.visible = self.is_visible(&item.text, term, item.active);
            visible += usize::from(item.visible);
        }
        visible
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
