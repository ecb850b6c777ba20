//! Folio - behavior layer for a static portfolio page
//!
//! Folio wires theme switching, the mobile menu, smooth in-page navigation,
//! scroll effects, reveal-on-scroll animations and the contact form onto a
//! page it reaches through the [`surface::Surface`] trait. The same code runs
//! headless over [`surface::MemorySurface`] (tests and the `folio replay`
//! command) and in the browser over `web-sys`.

pub mod app;
pub mod config;
pub mod controllers;
pub mod error;
pub mod paths;
pub mod script;
pub mod store;
pub mod surface;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::{Event, NotificationKind, PageState, Portfolio, ThemeMode};
pub use config::Config;
pub use error::{FolioError, StoreError};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use surface::{MemorySurface, Surface, portfolio_page};
