//! In-page anchors: offset scrolling and the active nav link

use tracing::debug;

use crate::app::Context;
use crate::error::Result;
use crate::surface::{ElementId, ScrollBehavior, Surface};

const ACTIVE_CLASS: &str = "active";

/// A resolved anchor click, ready to scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    /// Clicked link
    pub link: ElementId,
    /// Section the link points at
    pub section: ElementId,
    /// Scroll offset that puts the section just under the header
    pub top: f64,
}

/// Anchor handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    header: Option<ElementId>,
}

impl Navigation {
    /// Resolve the fixed header used to offset jumps
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other controllers
    pub fn init(cx: &mut Context<'_>) -> Result<Option<Self>> {
        let header = cx.surface.query(&cx.config.selectors.header);
        if header.is_none() {
            debug!("No header; anchor jumps will not be offset");
        }
        Ok(Some(Self { header }))
    }

    /// Work out where a click on `target` should scroll to.
    ///
    /// `None` when the click is not on an in-page anchor, or when the anchor
    /// (including a bare `#`) does not name an element on the page.
    #[must_use]
    pub fn resolve(&self, cx: &Context<'_>, target: ElementId) -> Option<Jump> {
        let link = cx.surface.closest(target, &cx.config.selectors.anchors)?;
        let href = cx.surface.attribute(link, "href")?;
        let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        let Some(section) = cx.surface.element_by_id(id) else {
            debug!(%href, "Anchor target not found");
            return None;
        };
        let header_height = self
            .header
            .map_or(0.0, |header| cx.surface.offset_height(header));
        Some(Jump {
            link,
            section,
            top: cx.surface.offset_top(section) - header_height,
        })
    }

    /// Scroll to a resolved anchor and mark its link active
    pub fn jump(cx: &mut Context<'_>, jump: Jump) {
        debug!(top = jump.top, "Scrolling to section");
        cx.surface.scroll_to(jump.top, ScrollBehavior::Smooth);
        set_active_link(cx, jump.link);
    }
}

/// Move the active indicator to `link`
pub fn set_active_link(cx: &mut Context<'_>, link: ElementId) {
    for other in cx.surface.query_all(&cx.config.selectors.nav_links) {
        cx.surface.remove_class(other, ACTIVE_CLASS);
    }
    cx.surface.add_class(link, ACTIVE_CLASS);
    cx.state.active_link = Some(link);
}

/// Whether `target` sits inside an in-page anchor matched by `anchors`.
///
/// Every such click is handled here, including anchors whose target does
/// not exist, so the browser never performs its own jump.
#[must_use]
pub fn is_in_page_anchor(surface: &dyn Surface, anchors: &str, target: ElementId) -> bool {
    surface.closest(target, anchors).is_some()
}

/// Smooth-scroll back to the top of the page
pub fn scroll_to_top(cx: &mut Context<'_>) {
    cx.surface.scroll_to(0.0, ScrollBehavior::Smooth);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Harness;
    use crate::surface::{ScrollRequest, Surface};

    fn nav(h: &mut Harness) -> Result<Navigation, Box<dyn std::error::Error>> {
        h.with_cx(Navigation::init)?
            .ok_or_else(|| "navigation missing".into())
    }

    fn link_to(h: &Harness, href: &str) -> Option<ElementId> {
        h.surface
            .query_all("a")
            .into_iter()
            .find(|a| h.surface.attribute(*a, "href").as_deref() == Some(href))
    }

    #[test]
    fn test_jump_offsets_by_header() -> Result<(), Box<dyn std::error::Error>> {
        let mut h = Harness::new();
        let nav = nav(&mut h)?;
        let link = link_to(&h, "#projects").ok_or("no link")?;

        let jump = h
            .with_cx(|cx| nav.resolve(cx, link))
            .ok_or("anchor did not resolve")?;
        // section at 1600, header 80 tall
        assert!((jump.top - 1520.0).abs() < f64::EPSILON);

        h.with_cx(|cx| Navigation::jump(cx, jump));
        assert_eq!(
            h.surface.scroll_requests().last(),
            Some(&ScrollRequest {
                top: 1520.0,
                behavior: ScrollBehavior::Smooth
            })
        );
        assert!(h.surface.has_class(link, ACTIVE_CLASS));
        assert_eq!(h.state.active_link, Some(link));
        Ok(())
    }

    #[test]
    fn test_only_one_active_link() -> Result<(), Box<dyn std::error::Error>> {
        let mut h = Harness::new();
        let about = link_to(&h, "#about").ok_or("no link")?;
        let contact = link_to(&h, "#contact").ok_or("no link")?;

        h.with_cx(|cx| {
            set_active_link(cx, about);
            set_active_link(cx, contact);
        });

        let active: Vec<_> = h
            .surface
            .query_all(".nav-link")
            .into_iter()
            .filter(|a| h.surface.has_class(*a, ACTIVE_CLASS))
            .collect();
        assert_eq!(active, vec![contact]);
        Ok(())
    }

    #[test]
    fn test_unresolvable_anchors_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let mut h = Harness::new();
        let nav = nav(&mut h)?;
        let missing = link_to(&h, "#missing").ok_or("no link")?;
        let bare = link_to(&h, "#").ok_or("no logo")?;
        let section = h.surface.query("#about").ok_or("no section")?;

        assert_eq!(h.with_cx(|cx| nav.resolve(cx, missing)), None);
        assert_eq!(h.with_cx(|cx| nav.resolve(cx, bare)), None);
        assert_eq!(h.with_cx(|cx| nav.resolve(cx, section)), None);
        Ok(())
    }

    #[test]
    fn test_every_in_page_anchor_is_intercepted() -> Result<(), Box<dyn std::error::Error>> {
        let h = Harness::new();
        let anchors = &h.config.selectors.anchors;
        let link = link_to(&h, "#projects").ok_or("no link")?;
        let missing = link_to(&h, "#missing").ok_or("no link")?;
        let bare = link_to(&h, "#").ok_or("no logo")?;
        let section = h.surface.query("#about").ok_or("no section")?;

        assert!(is_in_page_anchor(&h.surface, anchors, link));
        assert!(is_in_page_anchor(&h.surface, anchors, missing));
        assert!(is_in_page_anchor(&h.surface, anchors, bare));
        assert!(!is_in_page_anchor(&h.surface, anchors, section));
        Ok(())
    }

    #[test]
    fn test_click_inside_anchor_is_intercepted() -> Result<(), Box<dyn std::error::Error>> {
        let mut h = Harness::new();
        let link = link_to(&h, "#about").ok_or("no link")?;
        let label = h.surface.append(link, "span");
        let body = h.surface.body().ok_or("no body")?;
        let external = h.surface.append(body, "a");
        h.surface.set_attribute(external, "href", "https://example.com");

        assert!(is_in_page_anchor(&h.surface, &h.config.selectors.anchors, label));
        assert!(!is_in_page_anchor(&h.surface, &h.config.selectors.anchors, external));
        Ok(())
    }

    #[test]
    fn test_no_header_means_no_offset() -> Result<(), Box<dyn std::error::Error>> {
        let mut h = Harness::new();
        h.config.selectors.header = ".no-such-header".to_string();
        let nav = nav(&mut h)?;
        let link = link_to(&h, "#about").ok_or("no link")?;

        let jump = h
            .with_cx(|cx| nav.resolve(cx, link))
            .ok_or("anchor did not resolve")?;
        assert!((jump.top - 800.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_scroll_to_top() {
        let mut h = Harness::new();
        h.surface.set_scroll_top(1200.0);
        h.with_cx(scroll_to_top);
        assert!(h.surface.scroll_metrics().scroll_top.abs() < f64::EPSILON);
    }
}
