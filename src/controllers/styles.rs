//! Rules for the elements the controllers create or flag

use tracing::debug;

use crate::surface::{ElementId, Surface};

const STYLE_ID: &str = "folio-styles";

/// Notification, form error, loading, theme toggle, menu slide-in and
/// keyboard focus ring rules
pub const PAGE_STYLES: &str = r".notification {
    position: fixed;
    top: 20px;
    right: 20px;
    background: white;
    border-radius: 8px;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
    padding: 16px;
    z-index: 10000;
    transform: translateX(100%);
    transition: transform 0.3s ease;
    max-width: 400px;
    border-left: 4px solid #6366f1;
}

.notification.show {
    transform: translateX(0);
}

.notification-success {
    border-left-color: #10b981;
}

.notification-error {
    border-left-color: #ef4444;
}

.notification-content {
    display: flex;
    align-items: center;
    gap: 12px;
}

.notification-close {
    position: absolute;
    top: 8px;
    right: 8px;
    background: none;
    border: none;
    cursor: pointer;
    color: #6b7280;
    padding: 4px;
}

.notification-close:hover {
    color: #374151;
}

.error {
    border-color: #ef4444 !important;
    box-shadow: 0 0 0 3px rgba(239, 68, 68, 0.1) !important;
}

.error-message {
    color: #ef4444;
    font-size: 14px;
    margin-top: 4px;
}

.loading {
    opacity: 0.7;
    cursor: not-allowed;
}

.theme-toggle {
    background: none;
    border: none;
    color: #6b7280;
    cursor: pointer;
    padding: 8px;
    border-radius: 6px;
    transition: all 0.3s ease;
}

.theme-toggle:hover {
    color: #6366f1;
    background: rgba(99, 102, 241, 0.1);
}

.animate-slide-in {
    animation: slideInFromRight 0.3s ease forwards;
}

@keyframes slideInFromRight {
    from {
        opacity: 0;
        transform: translateX(20px);
    }
    to {
        opacity: 1;
        transform: translateX(0);
    }
}

.keyboard-navigation *:focus {
    outline: 2px solid #6366f1 !important;
    outline-offset: 2px !important;
}
";

/// Append [`PAGE_STYLES`] to `<head>` once.
///
/// Returns the `<style>` element, or `None` when the document has no head.
pub fn inject(surface: &mut dyn Surface) -> Option<ElementId> {
    if let Some(existing) = surface.element_by_id(STYLE_ID) {
        return Some(existing);
    }
    let Some(head) = surface.head() else {
        debug!("No head element; skipping style injection");
        return None;
    };
    let style = surface.create_element("style", head);
    surface.set_attribute(style, "id", STYLE_ID);
    surface.set_text(style, PAGE_STYLES);
    Some(style)
}
