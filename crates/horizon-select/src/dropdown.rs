//! The dropdown visibility collaborator.
//!
//! The widget never draws its panel; it only tells the host's dropdown
//! widget to open or close it.

use std::sync::Arc;

use parking_lot::Mutex;

/// Opens and closes the panel.
pub trait DropdownMenu: Send {
    /// Open the panel.
    fn show(&mut self);

    /// Close the panel.
    fn hide(&mut self);
}

/// Creates a dropdown for the native control with the given id.
pub type DropdownFactory = Arc<dyn Fn(&str) -> Box<dyn DropdownMenu> + Send + Sync>;

/// A dropdown that only records whether it is open.
///
/// Clones share state, so a host or test can keep a handle while the widget
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct DetachedDropdown {
    state: Arc<Mutex<DropdownState>>,
}

#[derive(Debug, Default)]
struct DropdownState {
    open: bool,
    hide_count: usize,
}

impl DetachedDropdown {
    /// Create a closed dropdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// How many times the panel was told to close.
    pub fn hide_count(&self) -> usize {
        self.state.lock().hide_count
    }
}

impl DropdownMenu for DetachedDropdown {
    fn show(&mut self) {
        self.state.lock().open = true;
    }

    fn hide(&mut self) {
        let mut state = self.state.lock();
        state.open = false;
        state.hide_count += 1;
    }
}
