//! Render batch reconciliation.
//!
//! Merges freshly normalized records with the active selection into what the
//! panel shows and what the backing control mirrors. Both come out of one
//! [`RenderBatch`], so they can be swapped in together.

use std::collections::HashSet;

use horizon_select_core::logging::targets;

use crate::option::OptionRecord;
use crate::panel::PanelItem;

/// A deduplicated, capped set of records ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderBatch {
    /// The synthetic leading entry for the active value.
    pub active: Option<OptionRecord>,
    /// Fetched records, first occurrence of each value only.
    pub records: Vec<OptionRecord>,
}

impl RenderBatch {
    /// Nothing to render, active entry included.
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.records.is_empty()
    }

    /// Number of entries, active entry included.
    pub fn len(&self) -> usize {
        self.records.len() + usize::from(self.active.is_some())
    }

    /// Panel items, active entry first.
    pub fn panel_items(&self) -> Vec<PanelItem> {
        self.active
            .iter()
            .map(|active| PanelItem::active(active.value.clone(), active.text.clone()))
            .chain(self.records.iter().map(PanelItem::from_record))
            .collect()
    }

    /// Backing options, active entry first.
    pub fn backing_options(&self) -> Vec<OptionRecord> {
        self.active
            .iter()
            .chain(self.records.iter())
            .cloned()
            .collect()
    }
}

/// Build a render batch.
///
/// `active` is the entry to pin at the top, passed only when the active
/// value is shown and non-empty. Incoming records with its value are
/// dropped, as are repeated values. With a `cap`, the batch stops growing
/// once it holds `cap` entries, the active entry counting as one.
pub fn reconcile(
    incoming: impl IntoIterator<Item = OptionRecord>,
    active: Option<OptionRecord>,
    cap: Option<usize>,
) -> RenderBatch {
    let mut seen: HashSet<String> = active.iter().map(|a| a.value.clone()).collect();
    let reserved = usize::from(active.is_some());
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for record in incoming {
        if cap.is_some_and(|cap| records.len() + reserved >= cap) {
            break;
        }
        if !seen.insert(record.value.clone()) {
            dropped += 1;
            continue;
        }
        records.push(record);
    }

    tracing::trace!(
        target: targets::RECONCILE,
        rendered = records.len(),
        dropped,
        has_active = active.is_some(),
        "render batch reconciled"
    );

    RenderBatch { active, records }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: &str, text: &str) -> OptionRecord {
        OptionRecord::new(value, text)
    }

    #[test]
    fn test_first_occurrence_wins() {
        let batch = reconcile(
            vec![rec("1", "A"), rec("2", "B"), rec("1", "A again")],
            None,
            None,
        );
        assert_eq!(batch.records, vec![rec("1", "A"), rec("2", "B")]);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_active_pinned_first() {
        let batch = reconcile(
            vec![rec("1", "A"), rec("5", "Fresh five"), rec("2", "B")],
            Some(rec("5", "Five")),
            None,
        );
        let items = batch.panel_items();
        assert_eq!(items[0], PanelItem::active("5", "Five"));
        assert_eq!(
            items[1..].iter().map(|i| i.value.as_str()).collect::<Vec<_>>(),
            vec!["1", "2"]
        );
        assert!(items[1..].iter().all(|i| !i.active));
        assert_eq!(
            batch.backing_options(),
            vec![rec("5", "Five"), rec("1", "A"), rec("2", "B")]
        );
    }

    #[test]
    fn test_cap_counts_active_entry() {
        let incoming = vec![rec("1", "A"), rec("2", "B"), rec("3", "C")];

        let batch = reconcile(incoming.clone(), Some(rec("9", "Nine")), Some(2));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records, vec![rec("1", "A")]);

        let batch = reconcile(incoming.clone(), None, Some(2));
        assert_eq!(batch.records, vec![rec("1", "A"), rec("2", "B")]);

        let batch = reconcile(incoming, Some(rec("9", "Nine")), Some(1));
        assert!(batch.records.is_empty());
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_duplicates_do_not_consume_cap() {
        let batch = reconcile(
            vec![rec("1", "A"), rec("1", "A"), rec("2", "B")],
            None,
            Some(2),
        );
        assert_eq!(batch.records, vec![rec("1", "A"), rec("2", "B")]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(reconcile(Vec::new(), None, None).is_empty());
        let only_active = reconcile(vec![rec("3", "C")], Some(rec("3", "C")), None);
        assert!(!only_active.is_empty());
        assert!(only_active.records.is_empty());
    }
}
