//! Async driver for select groups.
//!
//! [`SelectRuntime`] executes the fetches a [`SelectGroup`] queues, sleeps
//! until debounce deadlines, and feeds results back in the order they
//! resolve. Requests run concurrently, so a slow response can arrive after a
//! newer one; the widgets drop it by ticket.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use horizon_select::{AjaxConfig, BackingControl, Document, SelectConfig, SelectGroup, SelectRuntime, TokioClock};
//! use horizon_select_net::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::builder().base_url("https://example.com")?.build()?;
//! let runtime = SelectRuntime::new(client);
//!
//! let mut group = SelectGroup::builder()
//!     .clock(Arc::new(TokioClock))
//!     .config(SelectConfig::new().with_ajax(AjaxConfig::new("/api/cities")))
//!     .build(Document::new().with_element(BackingControl::new("city").with_class("horizon-select")))?;
//!
//! group.get_mut(0).unwrap().set_search_text("ber");
//! runtime.run_until_idle(&mut group).await;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Instant;

use futures_util::stream::{FuturesUnordered, StreamExt};
use horizon_select_core::Clock;
use horizon_select_core::logging::targets;
use horizon_select_net::{NetworkError, Transport};
use serde_json::Value;

use crate::fetch::{FetchTicket, PendingFetch};
use crate::group::SelectGroup;

/// A clock following tokio time, including paused test time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Executes queued fetches and debounce timers over a [`Transport`].
#[derive(Debug)]
pub struct SelectRuntime<T> {
    transport: T,
}

impl<T: Transport> SelectRuntime<T> {
    /// Create a runtime sending requests through `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Drive `group` until no fetch is in flight and no timer is pending.
    pub async fn run_until_idle(&self, group: &mut SelectGroup) {
        let mut in_flight = FuturesUnordered::new();

        loop {
            for fetch in group.take_pending_fetches() {
                in_flight.push(self.dispatch(fetch));
            }

            let deadline = group.next_deadline();
            if in_flight.is_empty() && deadline.is_none() {
                break;
            }
            let wake = deadline.map_or_else(tokio::time::Instant::now, tokio::time::Instant::from_std);

            tokio::select! {
                Some((ticket, result)) = in_flight.next(), if !in_flight.is_empty() => {
                    group.complete_fetch(ticket, result);
                }
                _ = tokio::time::sleep_until(wake), if deadline.is_some() => {
                    let fired = group.poll_timers();
                    tracing::trace!(target: targets::RUNTIME, fired, "timers polled");
                    if fired == 0 && group.next_deadline() == deadline {
                        tracing::warn!(
                            target: targets::RUNTIME,
                            "debounce deadline passed on tokio time but not on the group clock, stopping"
                        );
                        break;
                    }
                }
                else => break,
            }
        }

        tracing::debug!(target: targets::RUNTIME, "select group idle");
    }

    fn dispatch(
        &self,
        fetch: PendingFetch,
    ) -> impl Future<Output = (FetchTicket, Result<Value, NetworkError>)> + '_ {
        let PendingFetch {
            ticket, request, ..
        } = fetch;
        tracing::debug!(
            target: targets::RUNTIME,
            target_index = ticket.target,
            seq = ticket.seq,
            method = %request.method,
            url = %request.full_url(),
            "dispatching fetch"
        );
        let response = self.transport.fetch_json(request);
        async move { (ticket, response.await) }
    }
}
