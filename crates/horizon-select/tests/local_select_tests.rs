//! Tests for local-mode selects: startup selection, filtering, selection
//! transitions and group operations.

use std::sync::Arc;

use horizon_select::{
    BackingControl, DetachedDropdown, Document, DropdownMenu, SelectConfig, SelectError,
    SelectGroup, StatusKind,
};
use parking_lot::Mutex;

fn fruit() -> BackingControl {
    BackingControl::new("fruit")
        .with_class("horizon-select")
        .with_option("1", "O1")
        .with_option("2", "O2")
        .with_option("3", "O3")
}

fn build(config: SelectConfig, element: BackingControl) -> SelectGroup {
    SelectGroup::builder()
        .config(config)
        .build(Document::new().with_element(element))
        .expect("Failed to build group")
}

/// Config that records every onChange value.
fn recording(config: SelectConfig) -> (SelectConfig, Arc<Mutex<Vec<String>>>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    let config = config.with_on_change(move |value| sink.lock().push(value.to_string()));
    (config, changes)
}

fn visible_texts(group: &SelectGroup) -> Vec<String> {
    group
        .get(0)
        .unwrap()
        .panel()
        .visible_items()
        .map(|item| item.text.clone())
        .collect()
}

// ============================================================================
// Startup selection
// ============================================================================

#[test]
fn test_default_value_selects_option() {
    let group = build(SelectConfig::new().with_default_value("2"), fruit());
    let select = group.get(0).unwrap();

    assert_eq!(select.button().label(), "O2");
    assert!(!select.button().is_muted());
    assert_eq!(select.value(), "2");
    assert_eq!(group.value(), vec!["2".to_string()]);
    assert_eq!(select.panel().active_item().map(|i| i.value.as_str()), Some("2"));
}

#[test]
fn test_selection_priority() {
    let element = fruit().with_default_value_attr("3");

    // Configured default beats the attribute.
    let group = build(SelectConfig::new().with_default_value("2"), element.clone());
    assert_eq!(group.value(), vec!["2".to_string()]);

    // The attribute beats the native selection.
    let group = build(SelectConfig::new(), element.clone());
    assert_eq!(group.value(), vec!["3".to_string()]);

    // An unknown default falls through to the native selection.
    let group = build(
        SelectConfig::new().with_default_value("9"),
        fruit().with_selected_option("4", "O4"),
    );
    assert_eq!(group.value(), vec!["4".to_string()]);

    // noDefaultSelection wins over everything.
    let group = build(
        SelectConfig::new()
            .with_default_value("2")
            .with_no_default_selection(true),
        element,
    );
    let select = group.get(0).unwrap();
    assert_eq!(select.value(), "");
    assert_eq!(select.button().label(), "Please select...");
    assert!(select.button().is_muted());
}

#[test]
fn test_empty_native_value_resets() {
    let element = BackingControl::new("c")
        .with_class("horizon-select")
        .with_option("", "Choose")
        .with_option("1", "One");
    let group = build(SelectConfig::new(), element);
    let select = group.get(0).unwrap();

    assert_eq!(select.value(), "");
    assert!(select.button().is_muted());
    assert!(select.panel().active_item().is_none());
}

#[test]
fn test_startup_does_not_notify() {
    let (config, changes) = recording(SelectConfig::new().with_default_value("2"));
    let group = build(config, fruit());

    assert_eq!(group.value(), vec!["2".to_string()]);
    assert!(changes.lock().is_empty());
    assert!(group.get(0).unwrap().is_initialized());
}

// ============================================================================
// Selection transitions
// ============================================================================

#[test]
fn test_click_selects_notifies_and_closes() {
    let dropdown = DetachedDropdown::new();
    let handle = dropdown.clone();
    let (config, changes) = recording(SelectConfig::new().with_live_search(true));
    let mut group = SelectGroup::builder()
        .config(config)
        .dropdown_factory(move |_| Box::new(dropdown.clone()) as Box<dyn DropdownMenu>)
        .build(Document::new().with_element(fruit()))
        .expect("Failed to build group");

    let select = group.get_mut(0).unwrap();
    select.open();
    assert!(handle.is_open());

    select.set_search_text("o3");
    assert!(select.click_value("3"));

    assert_eq!(select.value(), "3");
    assert_eq!(select.button().label(), "O3");
    assert_eq!(select.panel().search_text(), "");
    assert_eq!(select.panel().visible_items().count(), 3);
    assert!(!handle.is_open());
    assert_eq!(*changes.lock(), vec!["3".to_string()]);
}

#[test]
fn test_toggle_law() {
    let (config, changes) = recording(SelectConfig::new().with_default_value("2"));
    let mut group = build(config, fruit());
    let select = group.get_mut(0).unwrap();
    let selected_button = select.button().clone();

    // Clicking the active item unselects.
    select.click_value("2");
    assert_eq!(select.value(), "");
    assert_eq!(select.button().label(), "Please select...");
    assert!(select.button().is_muted());
    assert!(select.panel().active_item().is_none());

    // Clicking it again restores the same state.
    select.click_value("2");
    assert_eq!(select.value(), "2");
    assert_eq!(select.button(), &selected_button);

    // Unselecting is silent; reselecting notifies.
    assert_eq!(*changes.lock(), vec!["2".to_string()]);
}

#[test]
fn test_reset_is_idempotent() {
    let mut group = build(SelectConfig::new().with_default_value("1"), fruit());
    let select = group.get_mut(0).unwrap();

    select.reset();
    let once = (
        select.panel().clone(),
        select.button().clone(),
        select.backing().clone(),
    );
    select.reset();
    let twice = (
        select.panel().clone(),
        select.button().clone(),
        select.backing().clone(),
    );

    assert_eq!(once, twice);
    assert_eq!(select.value(), "");
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_live_search_filters_ignoring_whitespace_and_case() {
    let element = BackingControl::new("city")
        .with_class("horizon-select")
        .with_option("", "Pick a city")
        .with_option("ny", "New York")
        .with_option("nh", "New Haven")
        .with_option("bo", "Boston");
    let mut group = build(SelectConfig::new().with_live_search(true), element);

    group.get_mut(0).unwrap().set_search_text("newy");
    assert_eq!(visible_texts(&group), vec!["New York"]);

    group.get_mut(0).unwrap().set_search_text("NEW ");
    assert_eq!(visible_texts(&group), vec!["New York", "New Haven"]);
    assert!(group.get(0).unwrap().panel().status().is_none());
}

#[test]
fn test_no_matches_shows_inline_status() {
    let mut group = build(SelectConfig::new().with_live_search(true), fruit());
    let select = group.get_mut(0).unwrap();
    select.reset();

    select.set_search_text("zzz");
    let status = select.panel().status().expect("no-results status");
    assert_eq!(status.kind, StatusKind::NoResults);
    assert_eq!(status.text, "No results");
    assert!(!select.panel().has_visible_content());

    select.set_search_text("o");
    assert!(select.panel().status().is_none());
    assert!(select.panel().has_visible_content());
}

#[test]
fn test_active_item_survives_filter() {
    let mut group = build(
        SelectConfig::new()
            .with_live_search(true)
            .with_default_value("2"),
        fruit(),
    );
    group.get_mut(0).unwrap().set_search_text("o1");
    assert_eq!(visible_texts(&group), vec!["O1", "O2"]);

    let mut group = build(
        SelectConfig::new()
            .with_live_search(true)
            .with_show_active(false)
            .with_default_value("2"),
        fruit(),
    );
    group.get_mut(0).unwrap().set_search_text("o1");
    assert_eq!(visible_texts(&group), vec!["O1"]);
}

#[test]
fn test_show_all_off_hides_items_until_typing() {
    let mut group = build(
        SelectConfig::new()
            .with_live_search(true)
            .with_show_all(false)
            .with_no_default_selection(true),
        fruit(),
    );
    assert!(visible_texts(&group).is_empty());
    assert!(!group.get(0).unwrap().panel().has_visible_content());

    group.get_mut(0).unwrap().set_search_text("2");
    assert_eq!(visible_texts(&group), vec!["O2"]);
}

#[test]
fn test_without_live_search_filter_runs_on_open() {
    let mut group = build(SelectConfig::new().with_no_default_selection(true), fruit());
    let select = group.get_mut(0).unwrap();
    assert!(!select.panel().is_search_visible());

    select.set_search_text("o3");
    assert_eq!(select.panel().visible_items().count(), 3);

    select.open();
    assert_eq!(visible_texts(&group), vec!["O3"]);
}

// ============================================================================
// Disabled state
// ============================================================================

#[test]
fn test_disabled_ignores_clicks() {
    let dropdown = DetachedDropdown::new();
    let handle = dropdown.clone();
    let (config, changes) = recording(SelectConfig::new().with_disabled(true).with_default_value("1"));
    let mut group = SelectGroup::builder()
        .config(config)
        .dropdown_factory(move |_| Box::new(dropdown.clone()) as Box<dyn DropdownMenu>)
        .build(Document::new().with_element(fruit()))
        .expect("Failed to build group");

    let select = group.get_mut(0).unwrap();
    assert!(select.is_disabled());
    assert_eq!(select.button().aria_disabled(), Some(true));

    select.open();
    select.click_value("3");
    assert!(!handle.is_open());
    assert_eq!(select.value(), "1");

    group.enable();
    let select = group.get_mut(0).unwrap();
    assert_eq!(select.button().aria_disabled(), Some(false));
    select.click_value("3");
    assert_eq!(select.value(), "3");
    assert_eq!(*changes.lock(), vec!["3".to_string()]);
}

#[test]
fn test_native_disabled_flag_disables_button() {
    let group = build(SelectConfig::new(), fruit().with_disabled(true));
    assert!(group.get(0).unwrap().is_disabled());
}

#[test]
fn test_disable_keeps_value_and_covers_unmanaged_elements() {
    let document = Document::new()
        .with_element(fruit())
        .with_element(BackingControl::new("empty").with_class("horizon-select"));
    let mut group = SelectGroup::builder()
        .config(SelectConfig::new().with_default_value("3"))
        .build(document)
        .expect("Failed to build group");

    assert_eq!(group.len(), 2);
    assert_eq!(group.managed_count(), 1);
    assert!(group.get(1).is_none());

    group.disable();
    assert_eq!(group.value(), vec!["3".to_string()]);
    assert!(group.targets().iter().all(|t| t.backing().is_disabled()));
    assert!(group.get(0).unwrap().button().is_disabled());

    group.enable();
    assert!(group.targets().iter().all(|t| !t.backing().is_disabled()));
}

// ============================================================================
// Group value access
// ============================================================================

#[test]
fn test_value_round_trip() {
    let mut group = build(SelectConfig::new().with_no_default_selection(true), fruit());
    for value in ["1", "2", "3", "2"] {
        group.set_value(&[value]);
        assert_eq!(group.value(), vec![value.to_string()]);
    }
}

#[test]
fn test_set_value_is_positional() {
    let other = BackingControl::new("other")
        .with_class("horizon-select")
        .with_option("a", "A")
        .with_option("b", "B");
    let (config, changes) = recording(SelectConfig::new().with_no_default_selection(true));
    let mut group = SelectGroup::builder()
        .config(config)
        .build(Document::new().with_element(fruit()).with_element(other))
        .expect("Failed to build group");

    group.set_value(&["2", "b"]);
    assert_eq!(group.get(0).unwrap().value(), "2");
    assert_eq!(group.get(1).unwrap().value(), "b");
    assert_eq!(*changes.lock(), vec!["2".to_string(), "b".to_string()]);

    // Re-applying the same values changes nothing.
    group.set_value(&["2", "b"]);
    assert_eq!(changes.lock().len(), 2);

    // Unknown and missing entries unselect.
    group.set_value(&["9"]);
    assert_eq!(group.get(0).unwrap().value(), "");
    assert_eq!(group.get(1).unwrap().value(), "");
    assert_eq!(group.get(0).unwrap().button().label(), "Please select...");

    group.set_value(&["1", ""]);
    assert_eq!(group.value(), vec!["1".to_string()]);
    assert_eq!(group.get(1).unwrap().value(), "");
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_on_loaded_fires_once_after_init() {
    let loaded = Arc::new(Mutex::new(0));
    let counter = loaded.clone();
    let group = build(
        SelectConfig::new().with_on_loaded(move || *counter.lock() += 1),
        fruit(),
    );

    assert_eq!(*loaded.lock(), 1);
    assert!(group.get(0).unwrap().is_initialized());
}

#[test]
fn test_unmatched_selector_is_inert() {
    let loaded = Arc::new(Mutex::new(0));
    let counter = loaded.clone();
    let mut group = SelectGroup::builder()
        .selector("#missing")
        .config(SelectConfig::new().with_on_loaded(move || *counter.lock() += 1))
        .build(Document::new().with_element(fruit()))
        .expect("Failed to build group");

    assert!(group.is_inert());
    assert_eq!(*loaded.lock(), 0);
    assert_eq!(group.value(), vec![String::new()]);

    group.set_value(&["1"]);
    group.disable();
    group.enable();
    assert!(group.take_pending_fetches().is_empty());
    assert_eq!(group.next_deadline(), None);
}

#[test]
fn test_selector_forms() {
    let document = || {
        Document::new()
            .with_element(fruit().with_class("picker"))
            .with_element(
                BackingControl::new("solo")
                    .with_option("x", "X"),
            )
    };

    let by_class = SelectGroup::builder().selector("picker").build(document()).unwrap();
    assert_eq!(by_class.len(), 1);

    let by_id = SelectGroup::builder().selector("#solo").build(document()).unwrap();
    assert_eq!(by_id.get(0).unwrap().value(), "x");

    let by_default = SelectGroup::builder().selector("").build(document()).unwrap();
    assert_eq!(by_default.get(0).unwrap().backing().id(), "fruit");
}

#[test]
fn test_button_model() {
    let group = build(
        SelectConfig::new()
            .with_class_name("form-select-sm  w-100")
            .with_live_search(true)
            .with_no_default_selection(true),
        fruit(),
    );
    let select = group.get(0).unwrap();

    assert_eq!(select.button().id(), "fruit");
    assert_eq!(select.button().classes(), ["form-select-sm", "w-100"]);
    assert!(select.panel().is_search_visible());
    assert_eq!(select.panel().search_placeholder(), "Search...");
    assert!(!select.is_scrollable());
}

#[test]
fn test_invalid_method_fails_build() {
    let config = SelectConfig::new()
        .with_ajax(horizon_select::AjaxConfig::new("/api").with_method("FETCH"));
    let err = SelectGroup::builder()
        .config(config)
        .build(Document::new().with_element(fruit()))
        .unwrap_err();

    assert!(matches!(err, SelectError::InvalidMethod { .. }));
}
