//! Widget configuration.
//!
//! [`SelectConfig`] mirrors the option surface of the widget. It can be
//! built in code, or loaded from JSON or TOML with camelCase keys; anything
//! left out takes its default. Callbacks and mappers are code, so they are
//! attached with builder methods after loading.
//!
//! # Example
//!
//! ```
//! use horizon_select::SelectConfig;
//!
//! let config = SelectConfig::from_json(r#"{
//!     "liveSearch": true,
//!     "defaultValue": 2,
//!     "ajax": { "url": "/api/countries", "minimumInputLength": 2 },
//!     "language": { "noResults": "Nothing found" }
//! }"#)
//! .unwrap()
//! .with_on_change(|value| println!("changed to {value}"));
//!
//! assert_eq!(config.default_value.as_deref(), Some("2"));
//! assert_eq!(config.ajax.as_ref().unwrap().minimum_input_length, 2);
//! assert_eq!(config.language.no_results, "Nothing found");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use horizon_select_core::logging::targets;
use horizon_select_net::HttpMethod;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, SelectError};
use crate::mapper::{RequestMapper, ResponseMapper};

/// Debounce used when `ajax.debounce` is zero.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Page length used when `ajax.length` is zero.
pub const DEFAULT_PAGE_LENGTH: u64 = 25;

/// Callback receiving the new value after a user-driven selection.
pub type ChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback invoked once every target has been initialized.
pub type LoadedCallback = Arc<dyn Fn() + Send + Sync>;

// ============================================================================
// Language
// ============================================================================

/// User-facing texts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    /// Placeholder of the search box.
    pub search_placeholder: String,
    /// Button label while nothing is selected.
    pub select_placeholder: String,
    /// Shown while a request is in flight.
    pub loading: String,
    /// Shown when nothing matches.
    pub no_results: String,
    /// Shown when a request fails without a message of its own.
    pub error: String,
    /// Shown below the minimum input length; `{remaining}` is substituted.
    pub type_more: String,
    /// Shown when the minimum input length is zero and the term is empty.
    pub idle_hint: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            search_placeholder: "Search...".to_string(),
            select_placeholder: "Please select...".to_string(),
            loading: "Loading...".to_string(),
            no_results: "No results".to_string(),
            error: "Error loading data".to_string(),
            type_more: "Type {remaining} more characters...".to_string(),
            idle_hint: "Start typing to search".to_string(),
        }
    }
}

impl Language {
    /// The "type more" hint with the first `{remaining}` replaced.
    pub fn type_more(&self, remaining: usize) -> String {
        let template = if self.type_more.is_empty() {
            "Type {remaining} more characters..."
        } else {
            self.type_more.as_str()
        };
        template.replacen("{remaining}", &remaining.to_string(), 1)
    }

    /// Loading text with its built-in fallback.
    pub fn loading_text(&self) -> &str {
        non_empty_or(&self.loading, "Loading...")
    }

    /// No-results text with its built-in fallback.
    pub fn no_results_text(&self) -> &str {
        non_empty_or(&self.no_results, "No results")
    }

    /// Error text with its built-in fallback.
    pub fn error_text(&self) -> &str {
        non_empty_or(&self.error, "Error loading data")
    }
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() { fallback } else { text }
}

// ============================================================================
// Ajax
// ============================================================================

/// Remote data source configuration. Its presence switches a widget into
/// remote mode.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AjaxConfig {
    /// Endpoint URL.
    pub url: String,
    /// HTTP method name, any case.
    pub method: String,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Keystroke debounce in milliseconds.
    pub debounce: u64,
    /// Characters required before a search is sent.
    pub minimum_input_length: usize,
    /// Page length sent as `length`.
    pub length: u64,
    /// Page start sent as `start`.
    pub start: u64,
    /// Whether opening the dropdown loads results straight away.
    pub initial_load: bool,
    /// Per-request timeout in milliseconds.
    pub timeout: Option<u64>,
    /// Reshapes search requests.
    #[serde(skip)]
    pub map_request: Option<RequestMapper>,
    /// Reshapes response bodies before normalization.
    #[serde(skip)]
    pub map_response: Option<ResponseMapper>,
    /// Reshapes resolve-by-value requests.
    #[serde(skip)]
    pub resolve_by_value: Option<RequestMapper>,
}

impl Default for AjaxConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "GET".to_string(),
            headers: BTreeMap::new(),
            debounce: DEFAULT_DEBOUNCE.as_millis() as u64,
            minimum_input_length: 0,
            length: DEFAULT_PAGE_LENGTH,
            start: 0,
            initial_load: false,
            timeout: None,
            map_request: None,
            map_response: None,
            resolve_by_value: None,
        }
    }
}

impl AjaxConfig {
    /// Create a configuration for `url` with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the debounce in milliseconds.
    pub fn with_debounce(mut self, millis: u64) -> Self {
        self.debounce = millis;
        self
    }

    /// Set the minimum input length.
    pub fn with_minimum_input_length(mut self, length: usize) -> Self {
        self.minimum_input_length = length;
        self
    }

    /// Set the page length.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    /// Set the page start.
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Load results as soon as the dropdown opens.
    pub fn with_initial_load(mut self, initial_load: bool) -> Self {
        self.initial_load = initial_load;
        self
    }

    /// Set a per-request timeout in milliseconds.
    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    /// Set the search request mapper.
    pub fn with_map_request(mut self, mapper: RequestMapper) -> Self {
        self.map_request = Some(mapper);
        self
    }

    /// Set the response mapper.
    pub fn with_map_response(mut self, mapper: ResponseMapper) -> Self {
        self.map_response = Some(mapper);
        self
    }

    /// Set the resolve-by-value request mapper.
    pub fn with_resolve_by_value(mut self, mapper: RequestMapper) -> Self {
        self.resolve_by_value = Some(mapper);
        self
    }

    /// The configured method.
    pub fn http_method(&self) -> Result<HttpMethod> {
        if self.method.trim().is_empty() {
            return Ok(HttpMethod::Get);
        }
        self.method
            .parse()
            .map_err(|_| SelectError::InvalidMethod {
                method: self.method.clone(),
            })
    }

    /// Effective keystroke debounce.
    pub fn debounce_delay(&self) -> Duration {
        match self.debounce {
            0 => DEFAULT_DEBOUNCE,
            millis => Duration::from_millis(millis),
        }
    }

    /// Effective page length.
    pub fn page_length(&self) -> u64 {
        match self.length {
            0 => DEFAULT_PAGE_LENGTH,
            length => length,
        }
    }

    /// Effective per-request timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|&ms| ms > 0).map(Duration::from_millis)
    }
}

impl fmt::Debug for AjaxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AjaxConfig")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("debounce", &self.debounce)
            .field("minimum_input_length", &self.minimum_input_length)
            .field("length", &self.length)
            .field("start", &self.start)
            .field("initial_load", &self.initial_load)
            .field("timeout", &self.timeout)
            .field("map_request", &self.map_request.is_some())
            .field("map_response", &self.map_response.is_some())
            .field("resolve_by_value", &self.resolve_by_value.is_some())
            .finish()
    }
}

// ============================================================================
// Select
// ============================================================================

/// Widget configuration, shared by every target of a group.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectConfig {
    /// Space-separated classes added to the button.
    pub class_name: String,
    /// Filter static items as the user types.
    pub live_search: bool,
    /// Compare search terms case-sensitively.
    pub case_sensitive: bool,
    /// Show every item while the search term is empty.
    pub show_all: bool,
    /// Keep the active item visible and marked.
    pub show_active: bool,
    /// Make long lists scroll.
    pub scroll_list: bool,
    /// Items shown before the list scrolls.
    pub scroll_items: usize,
    /// Cap on rendered remote items; non-positive means no cap.
    pub max_items_to_show: Option<i64>,
    /// Start unselected regardless of defaults.
    pub no_default_selection: bool,
    /// Start disabled.
    pub disabled: bool,
    /// Value selected at startup. Accepts strings and numbers.
    #[serde(deserialize_with = "loose_string")]
    pub default_value: Option<String>,
    /// Remote data source.
    pub ajax: Option<AjaxConfig>,
    /// User-facing texts.
    pub language: Language,
    /// Called with the new value after each user-driven selection.
    #[serde(skip)]
    pub on_change: Option<ChangeCallback>,
    /// Called once after every target is initialized.
    #[serde(skip)]
    pub on_loaded: Option<LoadedCallback>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            class_name: String::new(),
            live_search: false,
            case_sensitive: false,
            show_all: true,
            show_active: true,
            scroll_list: true,
            scroll_items: 8,
            max_items_to_show: None,
            no_default_selection: false,
            disabled: false,
            default_value: None,
            ajax: None,
            language: Language::default(),
            on_change: None,
            on_loaded: None,
        }
    }
}

impl SelectConfig {
    /// Create a configuration with every option at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON document.
    pub fn from_json(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        tracing::debug!(target: targets::CONFIG, remote = config.is_remote(), "configuration loaded from JSON");
        Ok(config)
    }

    /// Load from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        tracing::debug!(target: targets::CONFIG, remote = config.is_remote(), "configuration loaded from TOML");
        Ok(config)
    }

    /// Check values that cannot be caught while deserializing.
    pub fn validate(&self) -> Result<()> {
        if let Some(ajax) = &self.ajax {
            ajax.http_method()?;
        }
        Ok(())
    }

    /// Whether this configuration loads options remotely.
    pub fn is_remote(&self) -> bool {
        self.ajax.is_some()
    }

    /// Effective item cap.
    pub fn item_cap(&self) -> Option<usize> {
        self.max_items_to_show
            .filter(|&cap| cap > 0)
            .map(|cap| cap as usize)
    }

    /// Classes added to the button.
    pub fn button_classes(&self) -> Vec<String> {
        self.class_name
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Set extra button classes.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Enable or disable live search.
    pub fn with_live_search(mut self, live_search: bool) -> Self {
        self.live_search = live_search;
        self
    }

    /// Enable or disable case-sensitive matching.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Show or hide every item while the term is empty.
    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    /// Keep the active item visible and marked.
    pub fn with_show_active(mut self, show_active: bool) -> Self {
        self.show_active = show_active;
        self
    }

    /// Configure list scrolling.
    pub fn with_scroll(mut self, scroll_list: bool, scroll_items: usize) -> Self {
        self.scroll_list = scroll_list;
        self.scroll_items = scroll_items;
        self
    }

    /// Cap the number of rendered remote items.
    pub fn with_max_items_to_show(mut self, cap: i64) -> Self {
        self.max_items_to_show = Some(cap);
        self
    }

    /// Start unselected regardless of defaults.
    pub fn with_no_default_selection(mut self, no_default: bool) -> Self {
        self.no_default_selection = no_default;
        self
    }

    /// Start disabled.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the startup value.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Switch to remote mode.
    pub fn with_ajax(mut self, ajax: AjaxConfig) -> Self {
        self.ajax = Some(ajax);
        self
    }

    /// Replace the user-facing texts.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the change callback.
    pub fn with_on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// Set the loaded callback.
    pub fn with_on_loaded<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_loaded = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for SelectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectConfig")
            .field("class_name", &self.class_name)
            .field("live_search", &self.live_search)
            .field("case_sensitive", &self.case_sensitive)
            .field("show_all", &self.show_all)
            .field("show_active", &self.show_active)
            .field("scroll_list", &self.scroll_list)
            .field("scroll_items", &self.scroll_items)
            .field("max_items_to_show", &self.max_items_to_show)
            .field("no_default_selection", &self.no_default_selection)
            .field("disabled", &self.disabled)
            .field("default_value", &self.default_value)
            .field("ajax", &self.ajax)
            .field("language", &self.language)
            .field("on_change", &self.on_change.is_some())
            .field("on_loaded", &self.on_loaded.is_some())
            .finish()
    }
}

/// Accept a string, number or boolean and keep it as text.
fn loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|loose| match loose {
        Loose::Text(s) => s,
        Loose::Int(i) => i.to_string(),
        Loose::Float(f) => f.to_string(),
        Loose::Bool(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectConfig::default();
        assert!(config.show_all);
        assert!(config.show_active);
        assert!(config.scroll_list);
        assert_eq!(config.scroll_items, 8);
        assert_eq!(config.item_cap(), None);
        assert!(!config.is_remote());
        assert_eq!(config.language.select_placeholder, "Please select...");
    }

    #[test]
    fn test_json_partial_overrides() {
        let config = SelectConfig::from_json(
            r#"{"showAll": false, "maxItemsToShow": 5, "ajax": {"url": "/x", "method": "post"}}"#,
        )
        .unwrap();
        assert!(!config.show_all);
        assert!(config.show_active);
        assert_eq!(config.item_cap(), Some(5));
        let ajax = config.ajax.unwrap();
        assert_eq!(ajax.http_method().unwrap(), HttpMethod::Post);
        assert_eq!(ajax.page_length(), 25);
        assert_eq!(ajax.debounce_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_toml_config() {
        let config = SelectConfig::from_toml(
            r#"
            className = "form-select-sm w-100"
            defaultValue = 7

            [ajax]
            url = "/api"
            debounce = 0
            length = 0
            timeout = 1500

            [ajax.headers]
            X-Requested-With = "XMLHttpRequest"

            [language]
            typeMore = "Noch {remaining} Zeichen"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_value.as_deref(), Some("7"));
        assert_eq!(config.button_classes(), vec!["form-select-sm", "w-100"]);
        let ajax = config.ajax.as_ref().unwrap();
        assert_eq!(ajax.debounce_delay(), DEFAULT_DEBOUNCE);
        assert_eq!(ajax.page_length(), DEFAULT_PAGE_LENGTH);
        assert_eq!(ajax.request_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(ajax.headers["X-Requested-With"], "XMLHttpRequest");
        assert_eq!(config.language.type_more(2), "Noch 2 Zeichen");
    }

    #[test]
    fn test_invalid_method_rejected() {
        let err = SelectConfig::from_json(r#"{"ajax": {"method": "FETCH"}}"#).unwrap_err();
        assert!(matches!(err, SelectError::InvalidMethod { ref method } if method == "FETCH"));
    }

    #[test]
    fn test_type_more_replaces_first_placeholder_only() {
        let language = Language {
            type_more: "{remaining} left ({remaining})".into(),
            ..Language::default()
        };
        assert_eq!(language.type_more(3), "3 left ({remaining})");
        assert_eq!(Language::default().type_more(1), "Type 1 more characters...");
    }

    #[test]
    fn test_non_positive_cap_means_unlimited() {
        assert_eq!(SelectConfig::new().with_max_items_to_show(0).item_cap(), None);
        assert_eq!(SelectConfig::new().with_max_items_to_show(-3).item_cap(), None);
    }

    #[test]
    fn test_null_default_value() {
        let config = SelectConfig::from_json(r#"{"defaultValue": null}"#).unwrap();
        assert_eq!(config.default_value, None);
    }
}
