//! Interaction scripts replayed against the headless page
//!
//! A script is a JSON document listing visitor actions and waits. Replaying
//! it drives a [`Portfolio`] over the fixture page and records snapshots of
//! what the visitor would see.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::{Event, FormPhase, Key, NotificationKind, Portfolio, ThemeMode};
use crate::config::Config;
use crate::controllers::theme::stored_theme;
use crate::controllers::validate::Field;
use crate::error::{FolioError, Result};
use crate::store::{MemoryStore, PreferenceStore, THEME_KEY};
use crate::surface::{MemorySurface, Surface, portfolio_page};

/// One visitor action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Scroll the window to an offset
    Scroll {
        /// Target offset in pixels
        top: f64,
    },
    /// Click the `index`-th element matching `selector`
    Click {
        /// Element to click
        selector: String,
        /// Which match, in document order
        #[serde(default)]
        index: usize,
    },
    /// Type into a form field
    Type {
        /// Field to type into
        field: Field,
        /// Full new value
        value: String,
    },
    /// Move focus out of a form field
    Blur {
        /// Field that loses focus
        field: Field,
    },
    /// Submit the contact form
    Submit,
    /// Press a key (DOM `key` name)
    Key {
        /// Key name, e.g. `Escape` or `Tab`
        key: String,
    },
    /// Press a mouse button
    PointerDown,
    /// Change the OS color scheme
    SystemTheme {
        /// Whether the OS now prefers dark
        dark: bool,
    },
    /// Let time pass
    Wait {
        /// Milliseconds
        ms: u64,
    },
    /// Call the global theme toggle
    ToggleTheme,
    /// Call the global menu toggle
    ToggleMenu,
    /// Call the global scroll-to-top
    ScrollToTop,
    /// Call the global notification helper
    Notify {
        /// Message text
        message: String,
        /// Style, `info` when omitted
        #[serde(default)]
        kind: NotificationKind,
    },
    /// Record a snapshot
    Snapshot,
}

/// A replayable session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Simulated OS dark-scheme preference at load
    #[serde(default)]
    pub prefers_dark: bool,
    /// Explicit theme already stored at load
    #[serde(default)]
    pub stored_theme: Option<ThemeMode>,
    /// Actions, in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Notification as shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSnapshot {
    /// Message text
    pub message: String,
    /// Style
    pub kind: NotificationKind,
    /// Slid in
    pub visible: bool,
}

/// What the page looks like at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Virtual time
    pub at_ms: u64,
    /// Applied theme
    pub theme: ThemeMode,
    /// Explicit preference in the store
    pub stored_theme: Option<ThemeMode>,
    /// Mobile menu open
    pub menu_open: bool,
    /// Window scroll offset
    pub scroll_top: f64,
    /// Progress bar percentage
    pub progress: f64,
    /// Header carries `scrolled`
    pub header_scrolled: bool,
    /// Back-to-top control shown
    pub back_to_top_visible: bool,
    /// Focus ring enabled
    pub keyboard_navigation: bool,
    /// `href` of the active nav link
    pub active_link: Option<String>,
    /// Contact form phase
    pub form_phase: FormPhase,
    /// Field errors on display
    pub field_errors: BTreeMap<Field, String>,
    /// Submit button label
    pub submit_label: Option<String>,
    /// Notification on screen
    pub notification: Option<NotificationSnapshot>,
    /// Elements carrying `visible` from a reveal
    pub revealed: usize,
}

impl Snapshot {
    /// Capture the page as it is now
    #[must_use]
    pub fn capture<S: Surface, P: PreferenceStore>(page: &Portfolio<S, P>) -> Self {
        let surface = page.surface();
        let state = page.state();
        let selectors = &page.config().selectors;

        let field_errors = Field::ALL
            .into_iter()
            .filter_map(|field| state.form.error(field).map(|e| (field, e.to_string())))
            .collect();
        let submit_label = surface
            .query(&selectors.contact_form)
            .and_then(|form| surface.query_within(form, &selectors.submit_button).first().copied())
            .map(|button| surface.text(button));
        let revealed = surface
            .query_all(&selectors.reveal_targets)
            .into_iter()
            .filter(|el| surface.has_class(*el, "visible"))
            .count();

        Self {
            at_ms: page.now_ms(),
            theme: state.theme,
            stored_theme: stored_theme(page.store()),
            menu_open: state.menu_open,
            scroll_top: surface.scroll_metrics().scroll_top,
            progress: state.scroll.progress,
            header_scrolled: state.scroll.header_scrolled,
            back_to_top_visible: state.scroll.back_to_top_visible,
            keyboard_navigation: state.keyboard_navigation,
            active_link: state
                .active_link
                .and_then(|link| surface.attribute(link, "href")),
            form_phase: state.form.phase,
            field_errors,
            submit_label,
            notification: state.notification.as_ref().map(|n| NotificationSnapshot {
                message: n.message.clone(),
                kind: n.kind,
                visible: n.visible,
            }),
            revealed,
        }
    }
}

/// Run `script` on the fixture page.
///
/// Returns every requested snapshot followed by one of the final state.
///
/// # Errors
///
/// Returns an error if a click names an element the page does not have
pub fn replay(script: &Script, config: Config) -> Result<Vec<Snapshot>> {
    let mut surface = portfolio_page();
    surface.set_prefers_dark(script.prefers_dark);
    let mut store = MemoryStore::new();
    if let Some(theme) = script.stored_theme {
        store.set(THEME_KEY, theme.as_str())?;
    }

    let mut page = Portfolio::new(surface, store, config);
    page.sample_intersections();

    let mut snapshots = Vec::new();
    for (n, step) in script.steps.iter().enumerate() {
        debug!(step = n, ?step, "Replaying step");
        if *step == Step::Snapshot {
            snapshots.push(Snapshot::capture(&page));
            continue;
        }
        apply(&mut page, step)?;
        page.run_until_idle();
        page.sample_intersections();
    }
    snapshots.push(Snapshot::capture(&page));
    Ok(snapshots)
}

fn apply(page: &mut Portfolio<MemorySurface, MemoryStore>, step: &Step) -> Result<()> {
    match step {
        Step::Scroll { top } => {
            page.surface_mut().set_scroll_top(*top);
            page.dispatch(Event::ScrollChanged);
        }
        Step::Click { selector, index } => {
            let target = page
                .surface()
                .query_all(selector)
                .get(*index)
                .copied()
                .ok_or_else(|| FolioError::MissingElement {
                    controller: "replay",
                    selector: selector.clone(),
                })?;
            page.dispatch(Event::PointerDown);
            page.dispatch(Event::Click(target));
        }
        Step::Type { field, value } => page.dispatch(Event::FieldInput {
            field: *field,
            value: value.clone(),
        }),
        Step::Blur { field } => page.dispatch(Event::FieldBlurred(*field)),
        Step::Submit => page.dispatch(Event::SubmitRequested),
        Step::Key { key } => page.dispatch(Event::KeyPressed(Key::from_dom(key))),
        Step::PointerDown => page.dispatch(Event::PointerDown),
        Step::SystemTheme { dark } => {
            page.surface_mut().set_prefers_dark(*dark);
            page.dispatch(Event::SystemThemeChanged { dark: *dark });
        }
        Step::Wait { ms } => page.advance_by(*ms),
        Step::ToggleTheme => page.toggle_theme(),
        Step::ToggleMenu => page.toggle_mobile_menu(),
        Step::ScrollToTop => page.scroll_to_top(),
        Step::Notify { message, kind } => {
            page.show_notification(message, *kind);
        }
        Step::Snapshot => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(json: &str) -> Result<Vec<Snapshot>, Box<dyn std::error::Error>> {
        let script: Script = serde_json::from_str(json)?;
        Ok(replay(&script, Config::default())?)
    }

    #[test]
    fn test_parse_steps() -> Result<(), Box<dyn std::error::Error>> {
        let script: Script = serde_json::from_str(
            r#"{
                "steps": [
                    {"type": "click", "selector": ".mobile-menu-btn"},
                    {"type": "type", "field": "email", "value": "a@b.co"},
                    {"type": "wait", "ms": 250},
                    {"type": "notify", "message": "hi"},
                    {"type": "snapshot"}
                ]
            }"#,
        )?;
        assert_eq!(
            script.steps,
            vec![
                Step::Click {
                    selector: ".mobile-menu-btn".to_string(),
                    index: 0
                },
                Step::Type {
                    field: Field::Email,
                    value: "a@b.co".to_string()
                },
                Step::Wait { ms: 250 },
                Step::Notify {
                    message: "hi".to_string(),
                    kind: NotificationKind::Info
                },
                Step::Snapshot,
            ]
        );
        assert!(!script.prefers_dark);
        Ok(())
    }

    #[test]
    fn test_empty_script_gives_initial_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let snapshots = run("{}")?;
        assert_eq!(snapshots.len(), 1);
        let first = &snapshots[0];
        assert_eq!(first.theme, ThemeMode::Light);
        assert_eq!(first.stored_theme, None);
        assert_eq!(first.form_phase, FormPhase::Idle);
        assert_eq!(first.submit_label.as_deref(), Some("Send Message"));
        // only the hero title is on screen at load
        assert_eq!(first.revealed, 1);
        Ok(())
    }

    #[test]
    fn test_contact_session() -> Result<(), Box<dyn std::error::Error>> {
        let snapshots = run(r#"{
            "steps": [
                {"type": "click", "selector": ".nav-link", "index": 3},
                {"type": "wait", "ms": 20},
                {"type": "type", "field": "name", "value": "Al"},
                {"type": "type", "field": "email", "value": "al@example.com"},
                {"type": "type", "field": "message", "value": "Hello there friend"},
                {"type": "submit"},
                {"type": "snapshot"},
                {"type": "wait", "ms": 2000}
            ]
        }"#)?;

        let pending = &snapshots[0];
        assert_eq!(pending.form_phase, FormPhase::Submitting);
        assert_eq!(pending.submit_label.as_deref(), Some("Sending..."));
        assert_eq!(pending.active_link.as_deref(), Some("#contact"));
        assert!(pending.header_scrolled);

        let done = &snapshots[1];
        assert_eq!(done.form_phase, FormPhase::Idle);
        assert_eq!(done.submit_label.as_deref(), Some("Send Message"));
        let notification = done.notification.as_ref().ok_or("no notification")?;
        assert_eq!(notification.kind, NotificationKind::Success);
        Ok(())
    }

    #[test]
    fn test_blocked_session_records_errors() -> Result<(), Box<dyn std::error::Error>> {
        let snapshots = run(r#"{"steps": [{"type": "submit"}]}"#)?;
        let last = snapshots.last().ok_or("no snapshot")?;
        assert_eq!(
            last.field_errors.get(&Field::Name).map(String::as_str),
            Some("Name is required")
        );
        assert_eq!(last.field_errors.len(), 3);
        Ok(())
    }

    #[test]
    fn test_theme_session() -> Result<(), Box<dyn std::error::Error>> {
        let snapshots = run(r##"{
            "prefers_dark": true,
            "steps": [
                {"type": "snapshot"},
                {"type": "system_theme", "dark": false},
                {"type": "snapshot"},
                {"type": "click", "selector": "#theme-toggle i"},
                {"type": "system_theme", "dark": false}
            ]
        }"##)?;
        assert_eq!(snapshots[0].theme, ThemeMode::Dark);
        assert_eq!(snapshots[1].theme, ThemeMode::Light);
        assert_eq!(snapshots[2].theme, ThemeMode::Dark);
        assert_eq!(snapshots[2].stored_theme, Some(ThemeMode::Dark));
        Ok(())
    }

    #[test]
    fn test_unknown_click_target_fails() {
        let result = run(r##"{"steps": [{"type": "click", "selector": "#nope"}]}"##);
        assert!(result.is_err());
    }
}
