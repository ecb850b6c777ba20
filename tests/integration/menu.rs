//! Mobile menu visibility and scroll lock

use crate::common::{element, page};
use folio::app::{Event, Key};
use folio::Surface;

#[test]
fn test_double_toggle_restores_visibility_and_lock() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let panel = element(&page, "#mobile-menu")?;
    let body = page.surface().body().ok_or("no body")?;

    page.toggle_mobile_menu();
    assert!(!page.surface().has_class(panel, "hidden"));
    assert_eq!(page.surface().style(body, "overflow"), Some("hidden"));

    page.toggle_mobile_menu();
    assert!(page.surface().has_class(panel, "hidden"));
    assert_eq!(page.surface().style(body, "overflow"), None);
    assert!(!page.state().menu_open);
    Ok(())
}

#[test]
fn test_open_staggers_entries() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    page.toggle_mobile_menu();

    let delays: Vec<_> = page
        .surface()
        .query_all("#mobile-menu a")
        .into_iter()
        .map(|a| page.surface().style(a, "animation-delay").map(str::to_string))
        .collect();
    assert_eq!(
        delays,
        vec![
            Some("0s".to_string()),
            Some("0.1s".to_string()),
            Some("0.2s".to_string())
        ]
    );

    let icon = element(&page, ".mobile-menu-btn i")?;
    assert_eq!(
        page.surface().attribute(icon, "class").as_deref(),
        Some("fas fa-times")
    );
    Ok(())
}

#[test]
fn test_outside_click_and_escape_close() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let panel = element(&page, "#mobile-menu")?;
    let outside = element(&page, "#about")?;

    page.toggle_mobile_menu();
    page.dispatch(Event::Click(panel));
    assert!(page.state().menu_open, "click inside keeps it open");

    page.dispatch(Event::Click(outside));
    assert!(!page.state().menu_open);

    page.toggle_mobile_menu();
    page.dispatch(Event::KeyPressed(Key::from_dom("Escape")));
    assert!(!page.state().menu_open);

    // Escape on a closed menu is a no-op
    page.dispatch(Event::KeyPressed(Key::Escape));
    assert!(!page.state().menu_open);
    Ok(())
}

#[test]
fn test_nav_link_marks_active_and_scrolls() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let links = page.surface().query_all(".nav-link");
    let projects = links.get(2).copied().ok_or("no projects link")?;

    page.dispatch(Event::Click(projects));
    // #projects at 1600, minus the 80px header
    assert_eq!(
        page.surface().scroll_requests().last().map(|r| r.top),
        Some(1520.0)
    );
    assert_eq!(page.state().active_link, Some(projects));
    let active: Vec<_> = links
        .iter()
        .copied()
        .filter(|link| page.surface().has_class(*link, "active"))
        .collect();
    assert_eq!(active, vec![projects]);
    Ok(())
}
