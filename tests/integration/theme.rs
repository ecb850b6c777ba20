//! Theme selection, persistence and OS tracking

use crate::common::{element, is_dark, page, page_with};
use folio::app::Event;
use folio::store::THEME_KEY;
use folio::{MemoryStore, PreferenceStore, Surface, ThemeMode};
use proptest::prelude::*;

#[test]
fn test_os_preference_applies_without_storing() -> Result<(), Box<dyn std::error::Error>> {
    let page = page_with(true, MemoryStore::new());
    assert!(is_dark(&page));
    assert_eq!(page.state().theme, ThemeMode::Dark);
    assert_eq!(page.store().get(THEME_KEY)?, None);
    Ok(())
}

#[test]
fn test_toggle_created_with_matching_icon() -> Result<(), Box<dyn std::error::Error>> {
    let page = page_with(true, MemoryStore::new());
    let icon = element(&page, "#theme-toggle i")?;
    assert_eq!(
        page.surface().attribute(icon, "class").as_deref(),
        Some("fas fa-sun")
    );
    let nav = element(&page, "nav .flex")?;
    let toggle = element(&page, "#theme-toggle")?;
    assert_eq!(page.surface().parent(toggle), Some(nav));
    Ok(())
}

#[test]
fn test_existing_toggle_is_reused() -> Result<(), Box<dyn std::error::Error>> {
    let mut surface = folio::portfolio_page();
    let nav = surface.query("nav .flex").ok_or("no nav")?;
    let button = surface.create_element("button", nav);
    surface.set_attribute(button, "id", "theme-toggle");
    let page = folio::Portfolio::new(surface, MemoryStore::new(), folio::Config::default());

    assert_eq!(page.surface().query_all("#theme-toggle").len(), 1);
    assert_eq!(element(&page, "#theme-toggle")?, button);
    Ok(())
}

#[test]
fn test_os_change_ignored_once_chosen() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    page.dispatch(Event::SystemThemeChanged { dark: true });
    assert!(is_dark(&page));

    page.set_theme(ThemeMode::Light);
    page.dispatch(Event::SystemThemeChanged { dark: true });
    assert!(!is_dark(&page));
    assert_eq!(page.store().get(THEME_KEY)?.as_deref(), Some("light"));
    Ok(())
}

#[test]
fn test_unknown_stored_value_falls_back_to_os() {
    let page = page_with(true, MemoryStore::with(THEME_KEY, "sepia"));
    assert_eq!(page.state().theme, ThemeMode::Dark);
}

proptest! {
    #[test]
    fn prop_set_theme_persists_and_applies(
        dark_os in any::<bool>(),
        modes in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let mut page = page_with(dark_os, MemoryStore::new());
        for dark in modes {
            let mode = ThemeMode::from_dark(dark);
            page.set_theme(mode);
            prop_assert_eq!(page.state().theme, mode);
            prop_assert_eq!(is_dark(&page), dark);
            let stored = page.store().get(THEME_KEY).ok().flatten();
            prop_assert_eq!(stored.as_deref(), Some(mode.as_str()));
        }
    }

    #[test]
    fn prop_double_toggle_restores(dark_os in any::<bool>(), toggles in 0usize..8) {
        let mut page = page_with(dark_os, MemoryStore::new());
        let start = page.state().theme;
        for _ in 0..toggles {
            page.toggle_theme();
        }
        let expected = if toggles % 2 == 0 { start } else { start.flipped() };
        prop_assert_eq!(page.state().theme, expected);
    }
}
