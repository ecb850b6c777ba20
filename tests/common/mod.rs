//! Common test utilities shared across integration tests

use folio::app::Event;
use folio::controllers::validate::Field;
use folio::surface::ElementId;
use folio::{Config, MemoryStore, MemorySurface, Portfolio, Surface, portfolio_page};

/// Headless page over the fixture document
pub type Page = Portfolio<MemorySurface, MemoryStore>;

/// Fixture page, light OS scheme, nothing stored
pub fn page() -> Page {
    Portfolio::new(portfolio_page(), MemoryStore::new(), Config::default())
}

/// Fixture page with the given OS scheme and store
pub fn page_with(prefers_dark: bool, store: MemoryStore) -> Page {
    let mut surface = portfolio_page();
    surface.set_prefers_dark(prefers_dark);
    Portfolio::new(surface, store, Config::default())
}

/// First element matching `selector`
pub fn element(page: &Page, selector: &str) -> Result<ElementId, Box<dyn std::error::Error>> {
    page.surface()
        .query(selector)
        .ok_or_else(|| format!("no element for {selector}").into())
}

/// Type the three contact fields
pub fn fill_form(page: &mut Page, name: &str, email: &str, message: &str) {
    for (field, value) in [(Field::Name, name), (Field::Email, email), (Field::Message, message)] {
        page.dispatch(Event::FieldInput {
            field,
            value: value.to_string(),
        });
    }
}

/// Whether the body carries the dark theme class
pub fn is_dark(page: &Page) -> bool {
    page.surface()
        .body()
        .is_some_and(|body| page.surface().has_class(body, "dark-mode"))
}
