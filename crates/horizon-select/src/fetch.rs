//! Remote fetch orchestration.
//!
//! A remote [`SearchableSelect`] never performs I/O itself. Searches and
//! value resolves are queued as [`PendingFetch`] descriptors; a driver (the
//! [`SelectRuntime`](crate::SelectRuntime), or a test) executes them and
//! hands the outcome back through [`SearchableSelect::complete_fetch`].
//!
//! Every fetch carries a [`FetchTicket`]. Only the most recently issued
//! search may render; completions for older searches are dropped.

use std::sync::Arc;
use std::time::Instant;

use horizon_select_core::logging::targets;
use horizon_select_net::{HttpRequest, NetworkError};
use serde_json::Value;

use crate::normalize::normalize_response;
use crate::option::OptionRecord;
use crate::panel::{PanelItem, PanelStatus, StatusKind};
use crate::reconcile::reconcile;
use crate::request::{resolve_request, search_request};
use crate::select::SearchableSelect;

// ============================================================================
// Fetch Types
// ============================================================================

/// Where an instance is in its remote load cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing scheduled or in flight.
    #[default]
    Idle,
    /// A keystroke is waiting out the debounce delay.
    Debouncing,
    /// A search request is in flight.
    Loading,
    /// The last search rendered at least one item.
    Rendered,
    /// The last search rendered nothing.
    Empty,
    /// The last search failed.
    Error,
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    /// Position of the issuing instance in its group.
    pub target: usize,
    /// Per-instance sequence number, increasing with every fetch.
    pub seq: u64,
}

/// What a fetch is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// A search for the typed term.
    Search { term: String },
    /// A lookup of the label for a preset value.
    Resolve { value: String },
}

/// A request waiting to be executed by a driver.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    /// Ticket to complete the fetch with.
    pub ticket: FetchTicket,
    /// Purpose of the fetch.
    pub kind: FetchKind,
    /// The request to send.
    pub request: HttpRequest,
}

#[derive(Debug, Clone)]
pub(crate) struct PrefetchTicket {
    seq: u64,
    value: String,
    epoch: u64,
}

// ============================================================================
// Orchestration
// ============================================================================

impl SearchableSelect {
    /// Requests waiting to be sent, oldest first.
    pub fn take_pending_fetches(&mut self) -> Vec<PendingFetch> {
        std::mem::take(&mut self.outbox)
    }

    /// Whether requests are waiting to be sent.
    pub fn has_pending_fetches(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Whether a search response is still expected.
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting.is_some()
    }

    /// When the debounced search becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Run the debounced search if its delay has elapsed.
    ///
    /// Returns `true` if the debounce fired.
    pub fn poll_timers(&mut self) -> bool {
        let now = self.clock.now();
        if self.debouncer.poll(now).is_none() {
            return false;
        }

        let term = self.panel.search_text().to_string();
        let length = term.chars().count();
        let minimum = self.minimum_input_length();
        tracing::trace!(target: targets::FETCH, id = %self.backing.id(), %term, "debounce elapsed");

        if length < minimum {
            let hint = self.input_hint(length);
            self.show_hint(hint);
        } else {
            self.load(&term);
        }
        true
    }

    /// Feed the outcome of a fetch back in.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Value, NetworkError>) {
        if ticket.target != self.index {
            tracing::warn!(
                target: targets::FETCH,
                expected = self.index,
                got = ticket.target,
                "completion routed to the wrong instance"
            );
            return;
        }

        if let Some(prefetch) = self.prefetch.take_if(|p| p.seq == ticket.seq) {
            self.finish_prefetch(prefetch, result);
            return;
        }

        if self.awaiting != Some(ticket.seq) {
            tracing::debug!(
                target: targets::FETCH,
                id = %self.backing.id(),
                seq = ticket.seq,
                latest = ?self.awaiting,
                "discarding stale response"
            );
            return;
        }
        self.awaiting = None;

        match result {
            Ok(body) => {
                let config = Arc::clone(&self.config);
                let mapper = config.ajax.as_ref().and_then(|ajax| ajax.map_response.as_ref());
                let records = normalize_response(&body, mapper);
                tracing::debug!(target: targets::FETCH, id = %self.backing.id(), count = records.len(), "search completed");
                self.render_records(records);
            }
            Err(err) => {
                tracing::warn!(target: targets::FETCH, id = %self.backing.id(), error = %err, "search failed");
                self.show_error(err.user_message());
            }
        }
    }

    /// Show the loading status and queue a search for `term`.
    pub(crate) fn load(&mut self, term: &str) {
        let config = Arc::clone(&self.config);
        let Some(ajax) = config.ajax.as_ref() else {
            return;
        };

        self.show_status(StatusKind::Loading, config.language.loading_text());
        let ticket = self.issue_ticket();
        self.awaiting = Some(ticket.seq);
        self.fetch_state = FetchState::Loading;
        self.outbox.push(PendingFetch {
            ticket,
            kind: FetchKind::Search {
                term: term.to_string(),
            },
            request: search_request(ajax, term),
        });
        tracing::debug!(target: targets::FETCH, id = %self.backing.id(), seq = ticket.seq, %term, "search queued");
    }

    /// Queue a resolve for `value`.
    pub(crate) fn start_prefetch(&mut self, value: String) {
        let config = Arc::clone(&self.config);
        let Some(ajax) = config.ajax.as_ref() else {
            return;
        };

        let ticket = self.issue_ticket();
        let request = resolve_request(ajax, &value);
        self.prefetch = Some(PrefetchTicket {
            seq: ticket.seq,
            value: value.clone(),
            epoch: self.selection_epoch,
        });
        tracing::debug!(target: targets::FETCH, id = %self.backing.id(), seq = ticket.seq, %value, "prefetch queued");
        self.outbox.push(PendingFetch {
            ticket,
            kind: FetchKind::Resolve { value },
            request,
        });
    }

    /// A resolved prefetch selects without notifying `value_changed`; only
    /// user actions report a change.
    fn finish_prefetch(&mut self, prefetch: PrefetchTicket, result: Result<Value, NetworkError>) {
        let body = match result {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(target: targets::FETCH, id = %self.backing.id(), error = %err, "prefetch failed");
                return;
            }
        };

        if prefetch.epoch != self.selection_epoch {
            tracing::debug!(
                target: targets::FETCH,
                id = %self.backing.id(),
                "selection changed while resolving, ignoring prefetch"
            );
            return;
        }

        let config = Arc::clone(&self.config);
        let mapper = config.ajax.as_ref().and_then(|ajax| ajax.map_response.as_ref());
        let Some(found) = normalize_response(&body, mapper)
            .into_iter()
            .find(|record| record.value == prefetch.value)
        else {
            tracing::debug!(target: targets::FETCH, id = %self.backing.id(), value = %prefetch.value, "prefetch found no match");
            return;
        };

        self.render_records(vec![found.clone()]);
        match self.panel.position(&found.value) {
            Some(index) if self.panel.items()[index].active => self.relabel_active(&found.text),
            Some(index) => self.activate(index, false),
            None => {}
        }
        tracing::debug!(target: targets::FETCH, id = %self.backing.id(), value = %found.value, "prefetch resolved");
    }

    /// Replace the panel and the backing options with a reconciled batch.
    pub(crate) fn render_records(&mut self, records: Vec<OptionRecord>) {
        let batch = reconcile(records, self.synthetic_active(), self.config.item_cap());
        if batch.is_empty() {
            self.backing.replace_options(Vec::new());
            self.show_empty();
            return;
        }

        self.panel.set_status(None);
        self.panel.set_items(batch.panel_items());
        self.backing.replace_options(batch.backing_options());
        self.fetch_state = FetchState::Rendered;
    }

    /// Show a hint instead of results.
    ///
    /// Any search still in flight is abandoned, so its response is dropped
    /// as stale.
    pub(crate) fn show_hint(&mut self, hint: String) {
        if let Some(seq) = self.awaiting.take() {
            tracing::debug!(target: targets::FETCH, id = %self.backing.id(), seq, "search abandoned for hint");
        }
        let text = if hint.is_empty() {
            self.config.language.no_results_text().to_string()
        } else {
            hint
        };
        self.show_status(StatusKind::Hint, text);
        self.fetch_state = FetchState::Idle;
    }

    /// The hint for a term of `length` characters.
    pub(crate) fn input_hint(&self, length: usize) -> String {
        let minimum = self.minimum_input_length();
        if minimum > 0 {
            self.config.language.type_more(minimum.saturating_sub(length))
        } else {
            self.config.language.idle_hint.clone()
        }
    }

    pub(crate) fn minimum_input_length(&self) -> usize {
        self.config
            .ajax
            .as_ref()
            .map_or(0, |ajax| ajax.minimum_input_length)
    }

    fn show_empty(&mut self) {
        let text = self.config.language.no_results_text().to_string();
        self.show_status(StatusKind::NoResults, text);
        self.fetch_state = FetchState::Empty;
    }

    fn show_error(&mut self, message: Option<String>) {
        let text = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| self.config.language.error_text().to_string());
        self.show_status(StatusKind::Error, text);
        self.fetch_state = FetchState::Error;
    }

    /// Clear the items, keeping the active entry, and show `text`.
    fn show_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        let items = self
            .synthetic_active()
            .map(|active| vec![PanelItem::active(active.value, active.text)])
            .unwrap_or_default();
        self.panel.set_items(items);
        self.panel.set_status(Some(PanelStatus::new(kind, text)));
    }

    /// The entry pinned above fetched results.
    fn synthetic_active(&self) -> Option<OptionRecord> {
        let value = self.backing.value();
        if !self.config.is_remote() || !self.config.show_active || value.is_empty() {
            return None;
        }
        let text = match self.button.label() {
            "" => value,
            label => label,
        };
        Some(OptionRecord::new(value, text))
    }

    fn relabel_active(&mut self, text: &str) {
        self.button.set_label(text);
        self.button.set_muted(false);
        if let Some(item) = self.panel.items_mut().iter_mut().find(|item| item.active) {
            item.text = text.to_string();
        }
        let mut options = self.backing.options().to_vec();
        let value = self.backing.value().to_string();
        if let Some(option) = options.iter_mut().find(|option| option.value == value) {
            option.text = text.to_string();
        }
        self.backing.replace_options(options);
    }

    fn issue_ticket(&mut self) -> FetchTicket {
        self.next_seq += 1;
        FetchTicket {
            target: self.index,
            seq: self.next_seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::BackingControl;
    use crate::config::{AjaxConfig, SelectConfig};
    use crate::document::Document;
    use crate::group::SelectGroup;
    use serde_json::json;

    fn remote_group(ajax: AjaxConfig) -> SelectGroup {
        SelectGroup::builder()
            .config(SelectConfig::new().with_ajax(ajax))
            .build(Document::new().with_element(BackingControl::new("r").with_class("horizon-select")))
            .unwrap()
    }

    #[test]
    fn test_completion_for_other_target_is_ignored() {
        let mut group = remote_group(AjaxConfig::new("/api").with_initial_load(true));
        let select = group.get_mut(0).unwrap();
        select.open();
        let fetch = select.take_pending_fetches().remove(0);

        let wrong = FetchTicket {
            target: 3,
            seq: fetch.ticket.seq,
        };
        select.complete_fetch(wrong, Ok(json!(["x"])));
        assert!(select.is_awaiting_response());
        assert_eq!(select.fetch_state(), FetchState::Loading);

        select.complete_fetch(fetch.ticket, Ok(json!(["x"])));
        assert!(!select.is_awaiting_response());
    }

    #[test]
    fn test_tickets_increase() {
        let mut group = remote_group(AjaxConfig::new("/api").with_initial_load(true));
        let select = group.get_mut(0).unwrap();
        select.open();
        select.open();
        let fetches = select.take_pending_fetches();
        assert_eq!(fetches.len(), 2);
        assert!(fetches[0].ticket.seq < fetches[1].ticket.seq);
        assert_eq!(fetches[1].ticket.target, 0);
        assert!(!select.has_pending_fetches());
    }

    #[test]
    fn test_input_hint() {
        let mut group = remote_group(AjaxConfig::new("/api").with_minimum_input_length(4));
        let select = group.get_mut(0).unwrap();
        assert_eq!(select.input_hint(1), "Type 3 more characters...");
        assert_eq!(select.input_hint(9), "Type 0 more characters...");

        let group = remote_group(AjaxConfig::new("/api"));
        assert_eq!(group.get(0).unwrap().input_hint(0), "Start typing to search");
    }
}
