//! Target discovery.
//!
//! A [`Document`] is the set of native select elements a host exposes. A
//! [`Selector`] picks the ones a group should manage.

use std::fmt;

use crate::backing::BackingControl;

/// Class matched when no selector is given.
pub const DEFAULT_CLASS: &str = "horizon-select";

/// A class or id selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
}

impl Selector {
    /// Normalize a selector string.
    ///
    /// `None` and the empty string select [`DEFAULT_CLASS`]. Anything not
    /// starting with `.` or `#` is taken as a class name.
    pub fn parse(selector: Option<&str>) -> Self {
        let selector = selector.map(str::trim).unwrap_or_default();
        if selector.is_empty() {
            Self::Class(DEFAULT_CLASS.to_string())
        } else if let Some(id) = selector.strip_prefix('#') {
            Self::Id(id.to_string())
        } else {
            let class = selector.strip_prefix('.').unwrap_or(selector);
            Self::Class(class.to_string())
        }
    }

    /// Whether `element` matches.
    pub fn matches(&self, element: &BackingControl) -> bool {
        match self {
            Self::Class(class) => element.has_class(class),
            Self::Id(id) => element.id() == id,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => write!(f, ".{class}"),
            Self::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// The native select elements available to widgets, in document order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<BackingControl>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn with_element(mut self, element: BackingControl) -> Self {
        self.elements.push(element);
        self
    }

    /// Append an element in place.
    pub fn push(&mut self, element: BackingControl) {
        self.elements.push(element);
    }

    /// All elements.
    pub fn elements(&self) -> &[BackingControl] {
        &self.elements
    }

    /// Remove and return the elements matching `selector`, keeping order.
    pub fn take_matching(&mut self, selector: &Selector) -> Vec<BackingControl> {
        let (matched, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|element| selector.matches(element));
        self.elements = rest;
        matched
    }
}

impl FromIterator<BackingControl> for Document {
    fn from_iter<I: IntoIterator<Item = BackingControl>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_normalization() {
        assert_eq!(Selector::parse(None), Selector::Class("horizon-select".into()));
        assert_eq!(Selector::parse(Some("")), Selector::Class("horizon-select".into()));
        assert_eq!(Selector::parse(Some("picker")), Selector::Class("picker".into()));
        assert_eq!(Selector::parse(Some(".picker")), Selector::Class("picker".into()));
        assert_eq!(Selector::parse(Some("#country")), Selector::Id("country".into()));
        assert_eq!(Selector::parse(Some("picker")).to_string(), ".picker");
    }

    #[test]
    fn test_take_matching_keeps_order() {
        let mut document: Document = [
            BackingControl::new("a").with_class("pick"),
            BackingControl::new("b"),
            BackingControl::new("c").with_class("pick"),
        ]
        .into_iter()
        .collect();

        let taken = document.take_matching(&Selector::parse(Some("pick")));
        let ids: Vec<_> = taken.iter().map(BackingControl::id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(document.elements().len(), 1);
        assert!(document.take_matching(&Selector::Id("zzz".into())).is_empty());
    }
}
