//! Mobile navigation panel
//!
//! Every trigger (button click, click outside the open panel, Escape) goes
//! through [`MobileMenu::toggle`]; there is no separate close path. The panel,
//! the button glyph and the body scroll lock are all rewritten from
//! `PageState::menu_open` on every toggle so they cannot drift apart.

use tracing::debug;

use super::stagger_delay;
use crate::app::{Context, Key};
use crate::error::Result;
use crate::surface::ElementId;

const HIDDEN_CLASS: &str = "hidden";
const SLIDE_IN_CLASS: &str = "animate-slide-in";
const OPEN_ICON: &str = "fas fa-times";
const CLOSED_ICON: &str = "fas fa-bars";

/// Mobile menu panel and its button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileMenu {
    panel: Option<ElementId>,
    button: Option<ElementId>,
}

impl MobileMenu {
    /// Resolve the panel and button; either may be missing
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other controllers
    pub fn init(cx: &mut Context<'_>) -> Result<Option<Self>> {
        let selectors = &cx.config.selectors;
        let panel = cx.surface.query(&selectors.mobile_menu);
        let button = cx.surface.query(&selectors.mobile_menu_button);
        if panel.is_none() {
            debug!(selector = %selectors.mobile_menu, "Mobile menu panel not found");
        }
        if button.is_none() {
            debug!(selector = %selectors.mobile_menu_button, "Mobile menu button not found");
        }
        Ok(Some(Self { panel, button }))
    }

    /// Open the menu if closed, close it if open
    pub fn toggle(&self, cx: &mut Context<'_>) {
        cx.state.menu_open = !cx.state.menu_open;
        let open = cx.state.menu_open;
        debug!(open, "Mobile menu toggled");

        if let Some(panel) = self.panel {
            cx.surface.toggle_class(panel, HIDDEN_CLASS, !open);
            if open {
                let step = cx.config.stagger_step_ms;
                for (index, item) in cx.surface.query_within(panel, "a").into_iter().enumerate() {
                    cx.surface
                        .set_style(item, "animation-delay", &stagger_delay(index, step));
                    cx.surface.add_class(item, SLIDE_IN_CLASS);
                }
            }
        }

        if let Some(button) = self.button {
            let glyph = if open { OPEN_ICON } else { CLOSED_ICON };
            match cx.surface.query_within(button, "i").first() {
                Some(&icon) => cx.surface.set_attribute(icon, "class", glyph),
                None => {
                    cx.surface.set_icon(button, glyph);
                }
            }
        }

        if let Some(body) = cx.surface.body() {
            cx.surface
                .set_style(body, "overflow", if open { "hidden" } else { "" });
        }
    }

    /// Handle a click anywhere on the page.
    ///
    /// A click on the button toggles; a click outside both the open panel and
    /// the button closes. Returns `true` if the menu changed.
    pub fn on_click(&self, cx: &mut Context<'_>, target: ElementId) -> bool {
        let Some(button) = self.button else {
            return false;
        };
        if cx.surface.contains(button, target) {
            self.toggle(cx);
            return true;
        }
        if let Some(panel) = self.panel
            && cx.state.menu_open
            && !cx.surface.contains(panel, target)
        {
            self.toggle(cx);
            return true;
        }
        false
    }

    /// Escape closes an open menu
    pub fn on_key(&self, cx: &mut Context<'_>, key: &Key) {
        if *key == Key::Escape && cx.state.menu_open {
            self.toggle(cx);
        }
    }
}
