//! Per-dispatch borrow of everything a controller may touch

use crate::config::Config;
use crate::store::PreferenceStore;
use crate::surface::Surface;

use super::queue::EventQueue;
use super::state::PageState;

/// What a controller gets while it handles one event.
///
/// Built fresh by the bootstrap for each dispatch, so a controller can only
/// reach shared state through it and never holds on to it.
pub struct Context<'a> {
    /// Page the controllers act on
    pub surface: &'a mut dyn Surface,
    /// Persisted preferences
    pub store: &'a mut dyn PreferenceStore,
    /// Shared page state
    pub state: &'a mut PageState,
    /// Timers and follow-up events
    pub queue: &'a mut EventQueue,
    /// Timings, thresholds and hooks
    pub config: &'a Config,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("state", &self.state)
            .field("now_ms", &self.queue.now_ms())
            .finish_non_exhaustive()
    }
}
