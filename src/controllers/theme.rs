//! Light/dark theme
//!
//! The applied theme comes from the stored explicit preference when there is
//! one, otherwise from the OS color scheme. Toggling always stores the choice,
//! after which OS scheme changes no longer affect the page.

use tracing::{debug, warn};

use crate::app::{Context, ThemeMode};
use crate::config::Selectors;
use crate::error::{FolioError, Result};
use crate::store::{PreferenceStore, THEME_KEY};
use crate::surface::{ElementId, Surface};

const DARK_CLASS: &str = "dark-mode";
const TOGGLE_ID: &str = "theme-toggle";
const SUN_ICON: &str = "fas fa-sun";
const MOON_ICON: &str = "fas fa-moon";

/// Existing theme toggle, or a new one appended to the navigation bar.
///
/// Returns `None` when there is neither a toggle nor a place to put one.
pub fn ensure_toggle_exists(surface: &mut dyn Surface, selectors: &Selectors) -> Option<ElementId> {
    if let Some(existing) = surface.query(&selectors.theme_toggle) {
        return Some(existing);
    }
    let Some(nav) = surface.query(&selectors.nav_container) else {
        debug!(selector = %selectors.nav_container, "No navigation container for theme toggle");
        return None;
    };
    let button = surface.create_element("button", nav);
    surface.set_attribute(button, "id", TOGGLE_ID);
    surface.set_attribute(button, "class", "theme-toggle");
    surface.set_attribute(button, "aria-label", "Toggle dark mode");
    surface.set_icon(button, MOON_ICON);
    debug!("Created theme toggle");
    Some(button)
}

/// Explicit preference, if one is stored and readable.
///
/// Unreadable stores and unknown values count as "no preference".
pub fn stored_theme(store: &dyn PreferenceStore) -> Option<ThemeMode> {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => raw
            .parse()
            .inspect_err(|e| warn!(error = %e, "Ignoring stored theme"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Failed to read theme preference");
            None
        }
    }
}

/// Stored preference, then OS preference, then light
pub fn initial_theme(store: &dyn PreferenceStore, prefers_dark: bool) -> ThemeMode {
    stored_theme(store).unwrap_or_else(|| ThemeMode::from_dark(prefers_dark))
}

/// Theme toggle plus the applied mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeController {
    toggle: Option<ElementId>,
}

impl ThemeController {
    /// Create the toggle if needed and apply the initial theme
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no body to carry the theme class
    pub fn init(cx: &mut Context<'_>) -> Result<Option<Self>> {
        if cx.surface.body().is_none() {
            return Err(FolioError::MissingElement {
                controller: "theme",
                selector: "body".to_string(),
            });
        }
        let toggle = ensure_toggle_exists(cx.surface, &cx.config.selectors);
        let controller = Self { toggle };

        let mode = initial_theme(cx.store, cx.surface.prefers_dark_scheme());
        controller.apply(cx, mode);
        debug!(theme = %mode, "Initial theme applied");
        Ok(Some(controller))
    }

    /// The toggle button, if there is one
    #[must_use]
    pub const fn toggle(&self) -> Option<ElementId> {
        self.toggle
    }

    /// Apply `mode` and store it as the explicit preference
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be stored; the page still
    /// shows `mode`
    pub fn set_theme(&self, cx: &mut Context<'_>, mode: ThemeMode) -> Result<()> {
        self.apply(cx, mode);
        cx.store.set(THEME_KEY, mode.as_str())?;
        Ok(())
    }

    /// Flip the current theme
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be stored
    pub fn toggle_theme(&self, cx: &mut Context<'_>) -> Result<()> {
        let next = cx.state.theme.flipped();
        debug!(theme = %next, "Toggling theme");
        self.set_theme(cx, next)
    }

    /// Follow an OS scheme change unless the visitor chose a theme
    pub fn on_system_change(&self, cx: &mut Context<'_>, dark: bool) {
        if stored_theme(cx.store).is_some() {
            debug!("Explicit theme stored; ignoring OS scheme change");
            return;
        }
        self.apply(cx, ThemeMode::from_dark(dark));
    }

    /// Handle a click; `true` if it hit the toggle
    ///
    /// # Errors
    ///
    /// Returns an error if the new preference cannot be stored
    pub fn on_click(&self, cx: &mut Context<'_>, target: ElementId) -> Result<bool> {
        match self.toggle {
            Some(toggle) if cx.surface.contains(toggle, target) => {
                self.toggle_theme(cx)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn apply(&self, cx: &mut Context<'_>, mode: ThemeMode) {
        let dark = mode == ThemeMode::Dark;
        if let Some(body) = cx.surface.body() {
            cx.surface.toggle_class(body, DARK_CLASS, dark);
        }
        if let Some(toggle) = self.toggle {
            cx.surface
                .set_icon(toggle, if dark { SUN_ICON } else { MOON_ICON });
        }
        cx.state.theme = mode;
    }
}
