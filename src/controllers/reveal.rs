//! Entrance animations and lazy images, driven by element visibility
//!
//! Reveal is one-shot: once an element crosses the threshold it keeps
//! `visible` for good and is no longer watched. Grid children additionally
//! get a staggered `animation-delay` a moment after they appear. Lazy images
//! are watched separately with their own, looser visibility rule.

use std::collections::BTreeSet;

use tracing::debug;

use super::stagger_delay;
use crate::app::{Context, Timer};
use crate::error::Result;
use crate::surface::{ElementId, Surface};

const VISIBLE_CLASS: &str = "visible";
const GRID_CLASS: &str = "grid";
const LAZY_CLASS: &str = "lazy";
const HIDDEN_OPACITY: &str = "0";
const HIDDEN_TRANSFORM: &str = "translateY(30px)";

/// Fraction of an element inside the viewport, after trimming
/// `bottom_margin` pixels off the viewport's bottom edge.
///
/// Zero-height elements count as fully visible when they sit inside the
/// trimmed viewport.
#[must_use]
pub fn intersection_ratio(
    top: f64,
    height: f64,
    scroll_top: f64,
    viewport_height: f64,
    bottom_margin: f64,
) -> f64 {
    let view_top = scroll_top;
    let view_bottom = scroll_top + (viewport_height - bottom_margin).max(0.0);
    if height <= 0.0 {
        return if top >= view_top && top <= view_bottom { 1.0 } else { 0.0 };
    }
    let overlap = (top + height).min(view_bottom) - top.max(view_top);
    (overlap.max(0.0) / height).clamp(0.0, 1.0)
}

/// Watched elements that have not fired yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reveal {
    pending: BTreeSet<ElementId>,
    lazy_images: BTreeSet<ElementId>,
}

impl Reveal {
    /// Hide the fade-in targets and start watching everything
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other controllers
    pub fn init(cx: &mut Context<'_>) -> Result<Option<Self>> {
        let selectors = &cx.config.selectors;
        for el in cx.surface.query_all(&selectors.fade_targets) {
            cx.surface.set_style(el, "opacity", HIDDEN_OPACITY);
            cx.surface.set_style(el, "transform", HIDDEN_TRANSFORM);
        }
        let reveal = Self {
            pending: cx.surface.query_all(&selectors.reveal_targets).into_iter().collect(),
            lazy_images: cx.surface.query_all(&selectors.lazy_images).into_iter().collect(),
        };
        if reveal.is_idle() {
            debug!("Nothing to reveal");
            return Ok(None);
        }
        debug!(
            targets = reveal.pending.len(),
            images = reveal.lazy_images.len(),
            "Watching for reveals"
        );
        Ok(Some(reveal))
    }

    /// Elements still waiting to fire, in document order of their ids
    #[must_use]
    pub fn watched(&self) -> Vec<ElementId> {
        self.pending.union(&self.lazy_images).copied().collect()
    }

    /// Reveal targets still hidden
    #[must_use]
    pub fn pending_reveals(&self) -> Vec<ElementId> {
        self.pending.iter().copied().collect()
    }

    /// Lazy images not loaded yet
    #[must_use]
    pub fn pending_images(&self) -> Vec<ElementId> {
        self.lazy_images.iter().copied().collect()
    }

    /// Whether nothing is left to watch
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.lazy_images.is_empty()
    }

    /// A reveal target's visible fraction changed
    pub fn on_intersection(&mut self, cx: &mut Context<'_>, target: ElementId, ratio: f64) {
        if cx.config.reveal_visibility().accepts(ratio) && self.pending.remove(&target) {
            reveal(cx, target);
        }
    }

    /// A lazy image's visible fraction changed
    pub fn on_image_intersection(&mut self, cx: &mut Context<'_>, target: ElementId, ratio: f64) {
        if cx.config.lazy_image_visibility().accepts(ratio) && self.lazy_images.remove(&target) {
            load_image(cx.surface, target);
        }
    }
}

fn reveal(cx: &mut Context<'_>, target: ElementId) {
    cx.surface.add_class(target, VISIBLE_CLASS);
    cx.surface.set_style(target, "opacity", "");
    cx.surface.set_style(target, "transform", "");

    let Some(parent) = cx.surface.parent(target) else {
        return;
    };
    if !cx.surface.has_class(parent, GRID_CLASS) {
        return;
    }
    let index = cx
        .surface
        .children(parent)
        .iter()
        .position(|child| *child == target)
        .unwrap_or_default();
    cx.queue.schedule(
        cx.config.reveal_stagger_ms,
        Timer::RevealStagger { target, index },
    );
}

fn load_image(surface: &mut dyn Surface, img: ElementId) {
    if let Some(src) = surface.attribute(img, "data-src") {
        surface.set_attribute(img, "src", &src);
    }
    surface.remove_class(img, LAZY_CLASS);
    debug!("Lazy image loaded");
}

/// Give a revealed grid child its position-based animation delay
pub fn stagger(cx: &mut Context<'_>, target: ElementId, index: usize) {
    if !cx.surface.is_attached(target) {
        return;
    }
    let delay = stagger_delay(index, cx.config.stagger_step_ms);
    cx.surface.set_style(target, "animation-delay", &delay);
}
