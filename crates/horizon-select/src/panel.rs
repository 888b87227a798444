//! The dropdown panel model: search box, rendered items and status line.

use crate::option::OptionRecord;

/// A rendered, clickable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelItem {
    /// The option value.
    pub value: String,
    /// The label shown.
    pub text: String,
    /// Carries the active marker.
    pub active: bool,
    /// Not hidden by the filter.
    pub visible: bool,
}

impl PanelItem {
    /// A visible, inactive item for `record`.
    pub fn from_record(record: &OptionRecord) -> Self {
        Self {
            value: record.value.clone(),
            text: record.text.clone(),
            active: false,
            visible: true,
        }
    }

    /// A visible item carrying the active marker.
    pub fn active(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            active: true,
            visible: true,
        }
    }
}

/// What a status line is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A request is in flight.
    Loading,
    /// The term needs more input, or nothing has been typed yet.
    Hint,
    /// Nothing matched.
    NoResults,
    /// A request failed.
    Error,
}

/// A non-clickable message shown below the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStatus {
    /// Message kind.
    pub kind: StatusKind,
    /// Message text.
    pub text: String,
}

impl PanelStatus {
    /// Create a status line.
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The dropdown panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPanel {
    items: Vec<PanelItem>,
    status: Option<PanelStatus>,
    search_text: String,
    search_visible: bool,
    search_placeholder: String,
    has_visible_content: bool,
}

impl ItemPanel {
    pub(crate) fn new(search_visible: bool, search_placeholder: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            status: None,
            search_text: String::new(),
            search_visible,
            search_placeholder: search_placeholder.into(),
            has_visible_content: true,
        }
    }

    /// Rendered items, in order.
    pub fn items(&self) -> &[PanelItem] {
        &self.items
    }

    /// Items not hidden by the filter.
    pub fn visible_items(&self) -> impl Iterator<Item = &PanelItem> {
        self.items.iter().filter(|item| item.visible)
    }

    /// The item carrying the active marker.
    pub fn active_item(&self) -> Option<&PanelItem> {
        self.items.iter().find(|item| item.active)
    }

    /// Index of the first item with `value`.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }

    /// The current status line.
    pub fn status(&self) -> Option<&PanelStatus> {
        self.status.as_ref()
    }

    /// Text in the search box.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Whether the search box is shown.
    pub fn is_search_visible(&self) -> bool {
        self.search_visible
    }

    /// Placeholder of the search box.
    pub fn search_placeholder(&self) -> &str {
        &self.search_placeholder
    }

    /// Whether anything is visible below the search box.
    pub fn has_visible_content(&self) -> bool {
        self.has_visible_content
    }

    /// Whether the item list overflows `scroll_items` rows.
    pub fn is_scrollable(&self, scroll_list: bool, scroll_items: usize) -> bool {
        scroll_list && self.items.len() > scroll_items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [PanelItem] {
        &mut self.items
    }

    pub(crate) fn set_items(&mut self, items: Vec<PanelItem>) {
        self.items = items;
    }

    pub(crate) fn set_status(&mut self, status: Option<PanelStatus>) {
        self.status = status;
    }

    pub(crate) fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub(crate) fn set_has_visible_content(&mut self, visible: bool) {
        self.has_visible_content = visible;
    }

    pub(crate) fn clear_active(&mut self) {
        for item in &mut self.items {
            item.active = false;
        }
    }
}

/// The button standing in for the native control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectButton {
    id: String,
    label: String,
    muted: bool,
    disabled: bool,
    aria_disabled: Option<bool>,
    classes: Vec<String>,
}

impl SelectButton {
    pub(crate) fn new(id: impl Into<String>, label: impl Into<String>, classes: Vec<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            muted: false,
            disabled: false,
            aria_disabled: None,
            classes,
        }
    }

    /// Button id, taken from the native control.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The label shown.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the label is the muted placeholder.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the button ignores clicks.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The `aria-disabled` attribute, if set.
    pub fn aria_disabled(&self) -> Option<bool> {
        self.aria_disabled
    }

    /// Extra classes from the configuration.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.aria_disabled = Some(disabled);
    }
}
