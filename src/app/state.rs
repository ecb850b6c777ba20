//! Page state shared by the controllers
//!
//! One value owns everything mutable. The bootstrap lends it to whichever
//! controller is handling the current event, so there is a single writer at
//! any time and no module-level globals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::controllers::validate::{Field, ValidationError};
use crate::surface::ElementId;

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light (default)
    #[default]
    Light,
    /// Dark
    Dark,
}

impl ThemeMode {
    /// The other mode
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value persisted in the preference store
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Mode matching an OS dark-scheme flag
    #[must_use]
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme `{other}`")),
        }
    }
}

/// Contact form lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    /// Waiting for input
    #[default]
    Idle,
    /// Running the validators over every field
    Validating,
    /// Simulated submission in flight
    Submitting,
}

/// What the visitor sent, trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
}

/// Contact form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current phase
    pub phase: FormPhase,
    errors: [Option<ValidationError>; 3],
    /// Submission currently in flight
    pub pending: Option<ContactSubmission>,
    /// Most recently completed submission
    pub delivered: Option<ContactSubmission>,
}

impl FormState {
    /// Error currently displayed on `field`
    #[must_use]
    pub const fn error(&self, field: Field) -> Option<ValidationError> {
        self.errors[field.index()]
    }

    /// Record (or clear) the displayed error for `field`
    pub const fn set_error(&mut self, field: Field, error: Option<ValidationError>) {
        self.errors[field.index()] = error;
    }

    /// Fields that currently display an error, in form order
    #[must_use]
    pub fn failing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.error(*f).is_some())
            .collect()
    }

    /// Drop every displayed error
    pub fn clear_errors(&mut self) {
        self.errors = [None; 3];
    }
}

/// Notification style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Positive outcome
    Success,
    /// Failure the visitor should act on
    Error,
    /// Neutral information
    #[default]
    Info,
}

impl NotificationKind {
    /// Class suffix and serialized name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Font Awesome glyph for the kind
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Info => "info-circle",
        }
    }

    /// Parse leniently: anything unknown is informational
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

/// The single notification on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationState {
    /// Notification element
    pub element: ElementId,
    /// Message text
    pub message: String,
    /// Style
    pub kind: NotificationKind,
    /// Whether it has slid in (carries `show`)
    pub visible: bool,
}

/// Values derived from the scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollDerived {
    /// Reading progress, 0..=100
    pub progress: f64,
    /// Header carries `scrolled`
    pub header_scrolled: bool,
    /// Back-to-top control carries `visible`
    pub back_to_top_visible: bool,
}

/// Everything mutable about the page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    /// Applied color theme
    pub theme: ThemeMode,
    /// Mobile menu open
    pub menu_open: bool,
    /// Contact form
    pub form: FormState,
    /// Notification on screen
    pub notification: Option<NotificationState>,
    /// Last computed scroll effects
    pub scroll: ScrollDerived,
    /// Keyboard focus ring enabled
    pub keyboard_navigation: bool,
    /// Link carrying the active indicator
    pub active_link: Option<ElementId>,
}

impl PageState {
    /// Fresh state: light theme, menu closed, form idle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
