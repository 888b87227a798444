//! The canonical option record.

/// A selectable option: a unique `value` and its display `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OptionRecord {
    /// The key submitted as the control's value.
    pub value: String,
    /// The label shown to the user.
    pub text: String,
}

impl OptionRecord {
    /// Create a record with explicit text.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }

    /// Create a record whose text is its value.
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            text: value.clone(),
            value,
        }
    }
}

impl<V: Into<String>, T: Into<String>> From<(V, T)> for OptionRecord {
    fn from((value, text): (V, T)) -> Self {
        Self::new(value, text)
    }
}
