//! Logging facilities for Horizon Select.
//!
//! Every crate in the workspace logs through the `tracing` crate. To see
//! logs, install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_select=debug,horizon_select_net=info")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_select_core";
    /// Timer queue target.
    pub const TIMER: &str = "horizon_select_core::timer";
    /// Debouncer target.
    pub const DEBOUNCE: &str = "horizon_select_core::debounce";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";

    /// HTTP client target.
    pub const NET_HTTP: &str = "horizon_select_net::http";

    /// Configuration loading and target discovery.
    pub const CONFIG: &str = "horizon_select::config";
    /// Request building and mapper invocation.
    pub const REQUEST: &str = "horizon_select::request";
    /// Response normalization.
    pub const NORMALIZE: &str = "horizon_select::normalize";
    /// Render batch reconciliation.
    pub const RECONCILE: &str = "horizon_select::reconcile";
    /// Selection state transitions.
    pub const SELECTION: &str = "horizon_select::selection";
    /// Fetch orchestration, staleness and prefetch.
    pub const FETCH: &str = "horizon_select::fetch";
    /// Multi-target group operations.
    pub const GROUP: &str = "horizon_select::group";
    /// Async driver.
    pub const RUNTIME: &str = "horizon_select::runtime";
}
