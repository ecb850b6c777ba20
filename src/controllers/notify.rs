//! Toast notifications
//!
//! At most one notification is on the page. Showing a new one removes
//! whatever is there first, then inserts, then slides the new one in after a
//! short delay. Expired notifications lose `show`, and are removed once the
//! exit transition has had time to run.

use tracing::debug;

use crate::app::{Context, NotificationKind, NotificationState, Timer};
use crate::surface::ElementId;

const NOTIFICATION_SELECTOR: &str = ".notification";
const CLOSE_SELECTOR: &str = ".notification-close";

/// Show `message`, replacing any notification on screen.
///
/// Returns the new element, or `None` when the page has no body to hold it.
pub fn show(cx: &mut Context<'_>, message: &str, kind: NotificationKind) -> Option<ElementId> {
    for existing in cx.surface.query_all(NOTIFICATION_SELECTOR) {
        cx.surface.remove(existing);
    }
    cx.state.notification = None;

    let Some(body) = cx.surface.body() else {
        debug!("No body element; dropping notification");
        return None;
    };

    let s = &mut *cx.surface;
    let notification = s.create_element("div", body);
    s.set_attribute(
        notification,
        "class",
        &format!("notification notification-{}", kind.as_str()),
    );

    let content = s.create_element("div", notification);
    s.set_attribute(content, "class", "notification-content");
    let icon = s.create_element("i", content);
    s.set_attribute(icon, "class", &format!("fas fa-{}", kind.icon()));
    let text = s.create_element("span", content);
    s.set_text(text, message);

    let close = s.create_element("button", notification);
    s.set_attribute(close, "class", "notification-close");
    s.set_attribute(close, "aria-label", "Dismiss notification");
    s.set_icon(close, "fas fa-times");

    cx.state.notification = Some(NotificationState {
        element: notification,
        message: message.to_string(),
        kind,
        visible: false,
    });
    cx.queue.schedule(
        cx.config.notification_enter_ms,
        Timer::NotificationEnter(notification),
    );
    cx.queue.schedule(
        cx.config.notification_duration_ms,
        Timer::NotificationExpire(notification),
    );
    debug!(kind = kind.as_str(), "Notification shown");
    Some(notification)
}

/// Slide a notification in, if it is still on the page
pub fn enter(cx: &mut Context<'_>, notification: ElementId) {
    if !cx.surface.is_attached(notification) {
        return;
    }
    cx.surface.add_class(notification, "show");
    if let Some(current) = cx.state.notification.as_mut()
        && current.element == notification
    {
        current.visible = true;
    }
}

/// Start the exit transition of an expired notification
pub fn expire(cx: &mut Context<'_>, notification: ElementId) {
    if !cx.surface.is_attached(notification) {
        return;
    }
    cx.surface.remove_class(notification, "show");
    if let Some(current) = cx.state.notification.as_mut()
        && current.element == notification
    {
        current.visible = false;
    }
    cx.queue.schedule(
        cx.config.notification_exit_ms,
        Timer::NotificationRemove(notification),
    );
}

/// Take a notification off the page right away
pub fn remove(cx: &mut Context<'_>, notification: ElementId) {
    if cx.surface.is_attached(notification) {
        cx.surface.remove(notification);
    }
    if cx
        .state
        .notification
        .as_ref()
        .is_some_and(|n| n.element == notification)
    {
        cx.state.notification = None;
    }
}

/// Handle a click that may have landed on a close control.
///
/// Returns `true` when the click dismissed a notification.
pub fn handle_click(cx: &mut Context<'_>, target: ElementId) -> bool {
    let Some(close) = cx.surface.closest(target, CLOSE_SELECTOR) else {
        return false;
    };
    let Some(notification) = cx.surface.closest(close, NOTIFICATION_SELECTOR) else {
        return false;
    };
    remove(cx, notification);
    debug!("Notification dismissed");
    true
}
