//! Headless DOM used for tests and script replay

use std::collections::BTreeMap;

use tracing::warn;

use super::selector::{SelectorList, SelectorTarget};
use super::{ElementId, ScrollBehavior, ScrollMetrics, Surface};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
    offset_top: f64,
    offset_height: f64,
}

/// A programmatic scroll the page asked for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Requested offset, before clamping
    pub top: f64,
    /// Requested behavior
    pub behavior: ScrollBehavior,
}

/// Arena-backed document with just enough layout to drive scroll effects.
///
/// Element ids are never reused, so a handle to a removed element stays
/// invalid (detached) forever.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: Vec<Node>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    scroll: ScrollMetrics,
    prefers_dark: bool,
    scroll_requests: Vec<ScrollRequest>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// An empty `<html><head></head><body></body></html>` document
    #[must_use]
    pub fn new() -> Self {
        let mut surface = Self {
            nodes: vec![Node {
                tag: "html".to_string(),
                attached: true,
                ..Node::default()
            }],
            root: ElementId::new(0),
            head: ElementId::new(0),
            body: ElementId::new(0),
            scroll: ScrollMetrics {
                scroll_top: 0.0,
                document_height: 0.0,
                viewport_height: 800.0,
            },
            prefers_dark: false,
            scroll_requests: Vec::new(),
        };
        surface.head = surface.append(surface.root, "head");
        surface.body = surface.append(surface.root, "body");
        surface
    }

    /// Append a new element; shorthand for [`Surface::create_element`]
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::new(self.nodes.len());
        let attached = self.node(parent).is_some_and(|p| p.attached);
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            parent: Some(parent),
            attached,
            ..Node::default()
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Append an element with classes given as a space-separated list
    pub fn append_with_class(&mut self, parent: ElementId, tag: &str, classes: &str) -> ElementId {
        let id = self.append(parent, tag);
        self.set_attribute(id, "class", classes);
        id
    }

    /// Place an element in the document's vertical layout
    pub fn set_geometry(&mut self, el: ElementId, top: f64, height: f64) {
        if let Some(node) = self.node_mut(el) {
            node.offset_top = top;
            node.offset_height = height;
        }
    }

    /// Set the document and viewport heights
    pub const fn set_layout(&mut self, document_height: f64, viewport_height: f64) {
        self.scroll.document_height = document_height;
        self.scroll.viewport_height = viewport_height;
    }

    /// Move the viewport as a user scroll would (clamped to the document)
    pub fn set_scroll_top(&mut self, top: f64) {
        self.scroll.scroll_top = self.clamp_scroll(top);
    }

    /// Change the simulated OS color scheme
    pub const fn set_prefers_dark(&mut self, dark: bool) {
        self.prefers_dark = dark;
    }

    /// Inline style value
    #[must_use]
    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.node(el)?.styles.get(property).map(String::as_str)
    }

    /// Whether a form control is disabled
    #[must_use]
    pub fn is_disabled(&self, el: ElementId) -> bool {
        self.node(el).is_some_and(|n| n.disabled)
    }

    /// Tag name of an element
    #[must_use]
    pub fn tag(&self, el: ElementId) -> Option<&str> {
        self.node(el).map(|n| n.tag.as_str())
    }

    /// Programmatic scrolls requested so far
    #[must_use]
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.index())
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.index())
    }

    fn clamp_scroll(&self, top: f64) -> f64 {
        let max = (self.scroll.document_height - self.scroll.viewport_height).max(0.0);
        if top.is_nan() { 0.0 } else { top.clamp(0.0, max) }
    }

    /// Attached descendants of `root` in document order, `root` excluded
    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .node(root)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(el) = stack.pop() {
            out.push(el);
            if let Some(node) = self.node(el) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn parse(selector: &str) -> Option<SelectorList> {
        SelectorList::parse(selector)
            .inspect_err(|e| warn!(error = %e, "Ignoring unsupported selector"))
            .ok()
    }

    fn select(&self, root: ElementId, include_root: bool, selector: &str) -> Vec<ElementId> {
        let Some(list) = Self::parse(selector) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();
        if include_root {
            candidates.push(root);
        }
        candidates.extend(self.descendants(root));
        candidates
            .into_iter()
            .filter(|el| list.matches(self, *el))
            .collect()
    }
}

impl SelectorTarget for MemorySurface {
    fn tag_name(&self, el: ElementId) -> Option<&str> {
        self.tag(el)
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.node(el)?.attributes.get(name).map(String::as_str)
    }

    fn has_class_name(&self, el: ElementId, class: &str) -> bool {
        self.node(el).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn parent_of(&self, el: ElementId) -> Option<ElementId> {
        self.node(el)?.parent
    }
}

impl Surface for MemorySurface {
    fn body(&self) -> Option<ElementId> {
        Some(self.body)
    }

    fn head(&self) -> Option<ElementId> {
        Some(self.head)
    }

    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.select(self.root, true, selector)
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        if !self.is_attached(root) {
            return Vec::new();
        }
        self.select(root, false, selector)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|el| self.attr(*el, "id") == Some(id))
    }

    fn matches(&self, el: ElementId, selector: &str) -> bool {
        Self::parse(selector).is_some_and(|list| list.matches(self, el))
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.parent_of(el)
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.node(el).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(el) = cursor {
            if el == ancestor {
                return true;
            }
            cursor = self.parent_of(el);
        }
        false
    }

    fn is_attached(&self, el: ElementId) -> bool {
        self.node(el).is_some_and(|n| n.attached)
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.has_class_name(el, class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            node.classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            if value.is_empty() {
                node.styles.remove(property);
            } else {
                node.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        if name == "class" {
            let node = self.node(el)?;
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        self.attr(el, name).map(str::to_string)
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            if name == "class" {
                node.classes = value.split_whitespace().map(str::to_string).collect();
            } else {
                node.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn text(&self, el: ElementId) -> String {
        let Some(node) = self.node(el) else {
            return String::new();
        };
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&self.text(*child));
        }
        text
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        for child in self.children(el) {
            self.remove(child);
        }
        if let Some(node) = self.node_mut(el) {
            node.text = text.to_string();
        }
    }

    fn value(&self, el: ElementId) -> String {
        self.node(el).map(|n| n.value.clone()).unwrap_or_default()
    }

    fn set_value(&mut self, el: ElementId, value: &str) {
        if let Some(node) = self.node_mut(el) {
            node.value = value.to_string();
        }
    }

    fn set_disabled(&mut self, el: ElementId, disabled: bool) {
        if let Some(node) = self.node_mut(el) {
            node.disabled = disabled;
        }
    }

    fn create_element(&mut self, tag: &str, parent: ElementId) -> ElementId {
        self.append(parent, tag)
    }

    fn remove(&mut self, el: ElementId) {
        if el == self.root {
            return;
        }
        if let Some(parent) = self.parent_of(el)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != el);
        }
        let mut detached = self.descendants(el);
        detached.push(el);
        for id in detached {
            if let Some(node) = self.node_mut(id) {
                node.attached = false;
            }
        }
        if let Some(node) = self.node_mut(el) {
            node.parent = None;
        }
    }

    fn offset_top(&self, el: ElementId) -> f64 {
        self.node(el).map_or(0.0, |n| n.offset_top)
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.node(el).map_or(0.0, |n| n.offset_height)
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest { top, behavior });
        self.scroll.scroll_top = self.clamp_scroll(top);
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.prefers_dark
    }
}
