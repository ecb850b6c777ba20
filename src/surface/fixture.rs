//! Standard portfolio page for headless runs

use super::{ElementId, MemorySurface, Surface};

const VIEWPORT_HEIGHT: f64 = 800.0;
const DOCUMENT_HEIGHT: f64 = 3600.0;

fn link(surface: &mut MemorySurface, parent: ElementId, class: &str, href: &str, label: &str) {
    let a = surface.append_with_class(parent, "a", class);
    surface.set_attribute(a, "href", href);
    surface.set_text(a, label);
}

fn section(surface: &mut MemorySurface, id: &str, top: f64, height: f64) -> ElementId {
    let body = surface.body().unwrap_or_else(|| ElementId::new(0));
    let el = surface.append(body, "section");
    surface.set_attribute(el, "id", id);
    surface.set_geometry(el, top, height);
    el
}

fn field(surface: &mut MemorySurface, form: ElementId, tag: &str, name: &str) {
    let group = surface.append_with_class(form, "div", "form-group");
    let input = surface.append(group, tag);
    surface.set_attribute(input, "name", name);
}

/// Build the page the behavior layer was written against.
///
/// Header with desktop nav and a collapsed mobile panel, four sections
/// (`#home`, `#about`, `#projects`, `#contact`), a project grid, a lazy
/// image, the contact form, the progress bar and the back-to-top control.
/// The theme toggle is deliberately absent so startup has to create it.
#[must_use]
pub fn portfolio_page() -> MemorySurface {
    let mut s = MemorySurface::new();
    s.set_layout(DOCUMENT_HEIGHT, VIEWPORT_HEIGHT);
    let body = s.body().unwrap_or_else(|| ElementId::new(0));

    let progress = s.append_with_class(body, "div", "scroll-progress");
    s.set_attribute(progress, "id", "scroll-progress");

    let header = s.append_with_class(body, "header", "header");
    s.set_geometry(header, 0.0, 80.0);
    let nav = s.append(header, "nav");
    let bar = s.append_with_class(nav, "div", "flex");
    link(&mut s, bar, "logo", "#", "Portfolio");
    for (href, label) in [
        ("#home", "Home"),
        ("#about", "About"),
        ("#projects", "Projects"),
        ("#contact", "Contact"),
    ] {
        link(&mut s, bar, "nav-link", href, label);
    }
    let menu_button = s.append_with_class(bar, "button", "mobile-menu-btn");
    s.set_icon(menu_button, "fas fa-bars");

    let panel = s.append_with_class(header, "div", "mobile-menu hidden");
    s.set_attribute(panel, "id", "mobile-menu");
    for (href, label) in [
        ("#about", "About"),
        ("#projects", "Projects"),
        ("#contact", "Contact"),
    ] {
        link(&mut s, panel, "nav-link", href, label);
    }

    let home = section(&mut s, "home", 0.0, 800.0);
    let title = s.append_with_class(home, "h1", "fade-in");
    s.set_geometry(title, 200.0, 100.0);
    link(&mut s, home, "cta", "#missing", "Nowhere");

    let about = section(&mut s, "about", 800.0, 800.0);
    let intro = s.append_with_class(about, "p", "fade-in-left");
    s.set_geometry(intro, 900.0, 100.0);
    let portrait = s.append_with_class(about, "img", "lazy");
    s.set_attribute(portrait, "data-src", "/img/portrait.jpg");
    s.set_geometry(portrait, 1050.0, 300.0);

    let projects = section(&mut s, "projects", 1600.0, 1000.0);
    let grid = s.append_with_class(projects, "div", "grid");
    for _ in 0..3 {
        let card = s.append_with_class(grid, "div", "project-card");
        s.set_geometry(card, 1700.0, 300.0);
    }

    let contact = section(&mut s, "contact", 2600.0, 1000.0);
    let item = s.append_with_class(contact, "div", "contact-item");
    s.set_geometry(item, 2700.0, 100.0);
    let form = s.append(contact, "form");
    s.set_geometry(form, 2850.0, 500.0);
    field(&mut s, form, "input", "name");
    field(&mut s, form, "input", "email");
    field(&mut s, form, "textarea", "message");
    let submit = s.append(form, "button");
    s.set_attribute(submit, "type", "submit");
    s.set_text(submit, "Send Message");

    let back_to_top = s.append_with_class(body, "button", "back-to-top");
    s.set_attribute(back_to_top, "id", "back-to-top");
    s.set_icon(back_to_top, "fas fa-arrow-up");

    s
}
