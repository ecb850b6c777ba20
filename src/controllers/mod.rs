//! Page behaviors, one module per feature
//!
//! Each stateful controller resolves its DOM hooks once at startup through an
//! `init` that returns `Ok(None)` when the markup lacks the hook, so the
//! feature is simply absent. After that, controllers only act through the
//! [`crate::app::Context`] they are handed for the current event.

pub mod form;
pub mod keyboard;
pub mod menu;
pub mod nav;
pub mod notify;
pub mod reveal;
pub mod scroll;
pub mod styles;
pub mod theme;
pub mod validate;

pub use form::ContactForm;
pub use menu::MobileMenu;
pub use nav::{Jump, Navigation};
pub use reveal::Reveal;
pub use scroll::ScrollEffects;
pub use theme::ThemeController;

/// CSS `animation-delay` for the `index`-th item of a staggered group
#[must_use]
pub fn stagger_delay(index: usize, step_ms: u64) -> String {
    let ms = u64::try_from(index)
        .unwrap_or(u64::MAX)
        .saturating_mul(step_ms);
    #[expect(
        clippy::cast_precision_loss,
        reason = "delays are a few seconds at most"
    )]
    let seconds = ms as f64 / 1000.0;
    format!("{seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagger_delay_formats_seconds() {
        assert_eq!(stagger_delay(0, 100), "0s");
        assert_eq!(stagger_delay(1, 100), "0.1s");
        assert_eq!(stagger_delay(3, 100), "0.3s");
        assert_eq!(stagger_delay(12, 100), "1.2s");
        assert_eq!(stagger_delay(2, 250), "0.5s");
    }
}
