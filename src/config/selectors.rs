//! DOM hook configuration

use serde::{Deserialize, Serialize};

/// CSS selectors for every structural hook the controllers look up.
///
/// All of them are optional in the page: a selector that matches nothing
/// switches the corresponding feature off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Selectors {
    /// Fixed page header
    pub header: String,
    /// Collapsible mobile navigation panel
    pub mobile_menu: String,
    /// Button that opens and closes the mobile panel
    pub mobile_menu_button: String,
    /// Scroll progress bar
    pub scroll_progress: String,
    /// Back-to-top control
    pub back_to_top: String,
    /// Theme toggle button
    pub theme_toggle: String,
    /// Container the theme toggle is created in when the page has none
    pub nav_container: String,
    /// Contact form
    pub contact_form: String,
    /// Submit button inside the contact form
    pub submit_button: String,
    /// Links that carry the active indicator
    pub nav_links: String,
    /// In-page anchors that scroll smoothly
    pub anchors: String,
    /// Elements that start hidden and fade in when revealed
    pub fade_targets: String,
    /// Every element observed for reveal
    pub reveal_targets: String,
    /// Images whose source is deferred until they become visible
    pub lazy_images: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            header: ".header".to_string(),
            mobile_menu: "#mobile-menu".to_string(),
            mobile_menu_button: ".mobile-menu-btn".to_string(),
            scroll_progress: "#scroll-progress".to_string(),
            back_to_top: "#back-to-top".to_string(),
            theme_toggle: "#theme-toggle".to_string(),
            nav_container: "nav .flex".to_string(),
            contact_form: "form".to_string(),
            submit_button: "button[type=\"submit\"]".to_string(),
            nav_links: ".nav-link".to_string(),
            anchors: "a[href^=\"#\"]".to_string(),
            fade_targets: ".fade-in, .fade-in-left, .fade-in-right".to_string(),
            reveal_targets:
                ".fade-in, .fade-in-left, .fade-in-right, .project-card, .skill-item, .contact-item"
                    .to_string(),
            lazy_images: "img[data-src]".to_string(),
        }
    }
}
