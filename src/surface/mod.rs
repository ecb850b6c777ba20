//! The page the controllers act on
//!
//! Controllers never talk to a concrete DOM. They go through [`Surface`],
//! which the headless [`MemorySurface`] implements for tests and replay, and
//! which the browser build implements over `web-sys`.

mod fixture;
mod handles;
mod memory;
pub mod selector;

pub use fixture::portfolio_page;
pub use handles::Handles;
pub use memory::{MemorySurface, ScrollRequest};

use serde::{Deserialize, Serialize};

/// Opaque handle to an element owned by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(usize);

impl ElementId {
    /// Wrap a raw index
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Scroll geometry of the document, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset
    pub scroll_top: f64,
    /// Full rendered height of the document body
    pub document_height: f64,
    /// Height of the viewport
    pub viewport_height: f64,
}

/// How a programmatic scroll moves the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Animated
    #[default]
    Smooth,
    /// Jump
    Instant,
}

/// DOM operations the controllers need.
///
/// Lookups with a selector that matches nothing return `None` or an empty
/// list; the caller decides whether that disables a feature.
pub trait Surface {
    /// The `<body>` element
    fn body(&self) -> Option<ElementId>;

    /// The `<head>` element
    fn head(&self) -> Option<ElementId>;

    /// First element in document order matching `selector`
    fn query(&self, selector: &str) -> Option<ElementId>;

    /// Every element in document order matching `selector`
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Descendants of `root` matching `selector`, in document order
    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Element whose `id` attribute equals `id`
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Whether `el` matches `selector`
    fn matches(&self, el: ElementId, selector: &str) -> bool;

    /// Parent element
    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Child elements in order
    fn children(&self, el: ElementId) -> Vec<ElementId>;

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    /// Whether the element is still part of the document
    fn is_attached(&self, el: ElementId) -> bool;

    /// Whether the element carries `class`
    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// Add a class (no-op if present)
    fn add_class(&mut self, el: ElementId, class: &str);

    /// Remove a class (no-op if absent)
    fn remove_class(&mut self, el: ElementId, class: &str);

    /// Set an inline style property; an empty value removes it
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    /// Attribute value
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    /// Set an attribute
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    /// Text content
    fn text(&self, el: ElementId) -> String;

    /// Replace the element's content with text
    fn set_text(&mut self, el: ElementId, text: &str);

    /// Current value of a form control
    fn value(&self, el: ElementId) -> String;

    /// Set the value of a form control
    fn set_value(&mut self, el: ElementId, value: &str);

    /// Enable or disable a form control
    fn set_disabled(&mut self, el: ElementId, disabled: bool);

    /// Create an element and append it to `parent`
    fn create_element(&mut self, tag: &str, parent: ElementId) -> ElementId;

    /// Detach an element from the document
    fn remove(&mut self, el: ElementId);

    /// Distance from the top of the document
    fn offset_top(&self, el: ElementId) -> f64;

    /// Rendered height
    fn offset_height(&self, el: ElementId) -> f64;

    /// Current scroll geometry
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Scroll the window to a vertical offset
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Whether the OS asks for a dark color scheme
    fn prefers_dark_scheme(&self) -> bool;

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId> {
        let mut cursor = Some(el);
        while let Some(node) = cursor {
            if self.matches(node, selector) {
                return Some(node);
            }
            cursor = self.parent(node);
        }
        None
    }

    /// Add or remove `class` depending on `on`
    fn toggle_class(&mut self, el: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }

    /// Replace the element's content with a single `<i class="...">` glyph
    fn set_icon(&mut self, el: ElementId, icon_class: &str) -> ElementId {
        self.set_text(el, "");
        let icon = self.create_element("i", el);
        self.set_attribute(icon, "class", icon_class);
        icon
    }
}
