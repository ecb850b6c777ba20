//! Scroll-driven effects: progress bar, header state, back-to-top
//!
//! Scroll events are debounced on the trailing edge: each one cancels the
//! pending recompute and schedules a new one, so a burst collapses into a
//! single update once scrolling pauses.

use tracing::debug;

use crate::app::{Context, ScrollDerived, Timer, TimerId};
use crate::error::Result;
use crate::surface::{ElementId, ScrollMetrics};

const SCROLLED_CLASS: &str = "scrolled";
const VISIBLE_CLASS: &str = "visible";

/// Reading progress in percent.
///
/// `0` when there is nothing to scroll (or the geometry is not a number),
/// otherwise clamped to `0..=100`.
#[must_use]
pub fn scroll_progress(scroll_top: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable.is_nan() || scrollable <= 0.0 {
        return 0.0;
    }
    let progress = scroll_top / scrollable * 100.0;
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 100.0)
    }
}

/// Everything the scroll position decides, for the given thresholds
#[must_use]
pub fn derive_effects(
    metrics: ScrollMetrics,
    header_threshold: f64,
    back_to_top_threshold: f64,
) -> ScrollDerived {
    ScrollDerived {
        progress: scroll_progress(
            metrics.scroll_top,
            metrics.document_height,
            metrics.viewport_height,
        ),
        header_scrolled: metrics.scroll_top > header_threshold,
        back_to_top_visible: metrics.scroll_top > back_to_top_threshold,
    }
}

/// Progress bar, header and back-to-top control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollEffects {
    progress_bar: Option<ElementId>,
    header: Option<ElementId>,
    back_to_top: Option<ElementId>,
    pending: Option<TimerId>,
}

impl ScrollEffects {
    /// Resolve the elements scroll position drives
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other controllers
    pub fn init(cx: &mut Context<'_>) -> Result<Option<Self>> {
        let selectors = &cx.config.selectors;
        let effects = Self {
            progress_bar: cx.surface.query(&selectors.scroll_progress),
            header: cx.surface.query(&selectors.header),
            back_to_top: cx.surface.query(&selectors.back_to_top),
            pending: None,
        };
        if effects.progress_bar.is_none()
            && effects.header.is_none()
            && effects.back_to_top.is_none()
        {
            debug!("No scroll-driven elements");
            return Ok(None);
        }
        Ok(Some(effects))
    }

    /// The back-to-top control, if there is one
    #[must_use]
    pub const fn back_to_top(&self) -> Option<ElementId> {
        self.back_to_top
    }

    /// Restart the quiet period
    pub fn on_scroll(&mut self, cx: &mut Context<'_>) {
        if let Some(pending) = self.pending.take() {
            cx.queue.cancel(pending);
        }
        self.pending = Some(
            cx.queue
                .schedule(cx.config.scroll_debounce_ms, Timer::ScrollSettled),
        );
    }

    /// Recompute and apply every scroll effect
    pub fn settle(&mut self, cx: &mut Context<'_>) {
        self.pending = None;
        let derived = derive_effects(
            cx.surface.scroll_metrics(),
            cx.config.header_scrolled_threshold,
            cx.config.back_to_top_threshold,
        );

        if let Some(bar) = self.progress_bar {
            cx.surface
                .set_style(bar, "width", &format!("{}%", derived.progress));
        }
        if let Some(header) = self.header {
            cx.surface
                .toggle_class(header, SCROLLED_CLASS, derived.header_scrolled);
        }
        if let Some(button) = self.back_to_top {
            cx.surface
                .toggle_class(button, VISIBLE_CLASS, derived.back_to_top_visible);
        }
        cx.state.scroll = derived;
    }
}
