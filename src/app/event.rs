//! Typed page events

use serde::{Deserialize, Serialize};

use crate::controllers::validate::Field;
use crate::surface::ElementId;

/// Keys the page reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Escape closes the mobile menu
    Escape,
    /// Tab switches on the keyboard focus ring
    Tab,
    /// Anything else, by its DOM `key` name
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Deferred work scheduled on the [`super::EventQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timer {
    /// Scroll burst went quiet; recompute scroll effects
    ScrollSettled,
    /// Simulated form submission finished
    SubmissionComplete,
    /// Slide a freshly inserted notification in
    NotificationEnter(ElementId),
    /// Notification lifetime elapsed; start its exit
    NotificationExpire(ElementId),
    /// Exit transition finished; remove the notification
    NotificationRemove(ElementId),
    /// Apply the stagger delay to a revealed grid child
    RevealStagger {
        /// Revealed element
        target: ElementId,
        /// Position among its siblings
        index: usize,
    },
}

/// Page events, external and internal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// The window scrolled
    ScrollChanged,
    /// A form field lost focus
    FieldBlurred(Field),
    /// A form field received input
    FieldInput {
        /// Field that changed
        field: Field,
        /// Its new value
        value: String,
    },
    /// The contact form was submitted
    SubmitRequested,
    /// A click landed on an element
    Click(ElementId),
    /// A mouse button went down anywhere
    PointerDown,
    /// A key was pressed anywhere
    KeyPressed(Key),
    /// The OS color scheme changed
    SystemThemeChanged {
        /// Whether the OS now prefers dark
        dark: bool,
    },
    /// A reveal target's visible fraction changed
    Intersection {
        /// Observed element
        target: ElementId,
        /// Visible fraction within the margin-adjusted viewport
        ratio: f64,
    },
    /// A lazy image's visible fraction changed
    ImageIntersection {
        /// Observed image
        target: ElementId,
        /// Visible fraction within the image viewport
        ratio: f64,
    },
    /// A scheduled timer fired
    Timer(Timer),
}

impl Event {
    /// Short name used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ScrollChanged => "scroll_changed",
            Self::FieldBlurred(_) => "field_blurred",
            Self::FieldInput { .. } => "field_input",
            Self::SubmitRequested => "submit_requested",
            Self::Click(_) => "click",
            Self::PointerDown => "pointer_down",
            Self::KeyPressed(_) => "key_pressed",
            Self::SystemThemeChanged { .. } => "system_theme_changed",
            Self::Intersection { .. } => "intersection",
            Self::ImageIntersection { .. } => "image_intersection",
            Self::Timer(_) => "timer",
        }
    }
}
