//! The backing control: the native select element the widget replaces.
//!
//! It stays the authoritative holder of the submitted value. In local mode its
//! options are the static item source; in remote mode they are replaced with a
//! mirror of whatever was last rendered.

use crate::option::OptionRecord;

/// Attribute carrying a declarative default value.
pub const DEFAULT_VALUE_ATTRIBUTE: &str = "data-default-value";

/// A native single-value select element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackingControl {
    id: String,
    classes: Vec<String>,
    options: Vec<OptionRecord>,
    value: String,
    explicit_selection: bool,
    disabled: bool,
    default_value_attr: Option<String>,
}

impl BackingControl {
    /// Create an element with the given id and no options.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a CSS class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Append an option.
    ///
    /// Until an option is explicitly selected, the first option is the
    /// element's value.
    pub fn with_option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(OptionRecord::new(value, text));
        if !self.explicit_selection && self.options.len() == 1 {
            self.value = self.options[0].value.clone();
        }
        self
    }

    /// Append an option and mark it selected.
    pub fn with_selected_option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        let record = OptionRecord::new(value, text);
        self.value = record.value.clone();
        self.explicit_selection = true;
        self.options.push(record);
        self
    }

    /// Set the native disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the declarative default value attribute.
    pub fn with_default_value_attr(mut self, value: impl Into<String>) -> Self {
        self.default_value_attr = Some(value.into());
        self
    }

    /// Element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The options, in order.
    pub fn options(&self) -> &[OptionRecord] {
        &self.options
    }

    /// Whether the element has any options.
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// The current value; empty when unselected.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the current value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// The first option whose value is the current value.
    pub fn selected_option(&self) -> Option<&OptionRecord> {
        self.options.iter().find(|option| option.value == self.value)
    }

    /// Replace every option at once.
    pub fn replace_options(&mut self, options: Vec<OptionRecord>) {
        self.options = options;
    }

    /// The native disabled flag.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Set the native disabled flag.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// The declarative default value, if the attribute is present.
    pub fn default_value_attr(&self) -> Option<&str> {
        self.default_value_attr.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_option_is_implicit_value() {
        let control = BackingControl::new("c")
            .with_option("", "Please select")
            .with_option("1", "O1");
        assert_eq!(control.value(), "");
        assert_eq!(control.selected_option().map(|o| o.text.as_str()), Some("Please select"));
    }

    #[test]
    fn test_explicit_selection_wins() {
        let control = BackingControl::new("c")
            .with_option("1", "O1")
            .with_selected_option("2", "O2")
            .with_option("3", "O3");
        assert_eq!(control.value(), "2");
        assert_eq!(control.selected_option().map(|o| o.text.as_str()), Some("O2"));
    }

    #[test]
    fn test_empty_control() {
        let mut control = BackingControl::new("c").with_class("horizon-select");
        assert!(!control.has_options());
        assert_eq!(control.value(), "");
        assert!(control.has_class("horizon-select"));

        control.replace_options(vec![OptionRecord::new("9", "Nine")]);
        control.set_value("9");
        assert_eq!(control.selected_option(), Some(&OptionRecord::new("9", "Nine")));
    }
}
