//! Notification replacement and lifetime

use crate::common::page;
use folio::NotificationKind;
use folio::Surface;

#[test]
fn test_second_notification_replaces_first() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let first = page
        .show_notification("First", NotificationKind::Info)
        .ok_or("first not shown")?;
    page.advance_by(150);
    assert!(page.surface().has_class(first, "show"));

    let second = page
        .show_notification("Second", NotificationKind::Error)
        .ok_or("second not shown")?;
    assert!(!page.surface().is_attached(first));
    assert_eq!(page.surface().query_all(".notification").len(), 1);
    assert!(page.surface().has_class(second, "notification-error"));

    // the first one's expiry must not touch the second
    page.advance_by(4900);
    assert!(page.surface().is_attached(second));
    assert!(page.surface().has_class(second, "show"));
    assert_eq!(
        page.state().notification.as_ref().map(|n| n.message.as_str()),
        Some("Second")
    );
    Ok(())
}

#[test]
fn test_notification_markup() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let el = page
        .show_notification("Saved", NotificationKind::Success)
        .ok_or("not shown")?;
    let surface = page.surface();

    let icon = surface.query_within(el, ".notification-content i");
    assert_eq!(icon.len(), 1);
    assert_eq!(
        surface.attribute(icon[0], "class").as_deref(),
        Some("fas fa-check-circle")
    );
    let span = surface.query_within(el, "span");
    assert_eq!(span.first().map(|s| surface.text(*s)).as_deref(), Some("Saved"));
    assert_eq!(surface.query_within(el, ".notification-close").len(), 1);
    Ok(())
}

#[test]
fn test_never_two_at_once() {
    let mut page = page();
    for n in 0..5 {
        page.show_notification(&format!("n{n}"), NotificationKind::Info);
        page.advance_by(40);
        assert!(page.surface().query_all(".notification").len() <= 1);
    }
    page.advance_by(10_000);
    assert!(page.surface().query_all(".notification").is_empty());
    assert_eq!(page.pending_timers(), 0);
}
