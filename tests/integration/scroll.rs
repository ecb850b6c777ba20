//! Scroll progress, header and back-to-top, reveals

use crate::common::{element, page};
use folio::app::Event;
use folio::controllers::scroll::scroll_progress;
use folio::Surface;
use proptest::prelude::*;

#[test]
fn test_progress_without_scrollable_distance_is_zero() {
    assert!(scroll_progress(0.0, 800.0, 800.0).abs() < f64::EPSILON);
    assert!(scroll_progress(50.0, 800.0, 800.0).abs() < f64::EPSILON);
    assert!(scroll_progress(10.0, 600.0, 800.0).abs() < f64::EPSILON);
}

#[test]
fn test_progress_clamps_past_the_end() {
    assert!((scroll_progress(5000.0, 3600.0, 800.0) - 100.0).abs() < f64::EPSILON);
    assert!((scroll_progress(1400.0, 3600.0, 800.0) - 50.0).abs() < f64::EPSILON);
}

proptest! {
    #[test]
    fn prop_progress_in_range(
        top in -1e6f64..1e6,
        doc in 0f64..1e6,
        viewport in 0f64..1e6,
    ) {
        let p = scroll_progress(top, doc, viewport);
        prop_assert!((0.0..=100.0).contains(&p));
    }
}

#[test]
fn test_settled_scroll_updates_page() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let bar = element(&page, "#scroll-progress")?;
    let header = element(&page, ".header")?;
    let back = element(&page, "#back-to-top")?;

    page.surface_mut().set_scroll_top(1400.0);
    page.dispatch(Event::ScrollChanged);
    page.advance_by(10);

    assert_eq!(page.surface().style(bar, "width"), Some("50%"));
    assert!(page.surface().has_class(header, "scrolled"));
    assert!(page.surface().has_class(back, "visible"));

    page.surface_mut().set_scroll_top(200.0);
    page.dispatch(Event::ScrollChanged);
    page.advance_by(10);
    assert!(page.surface().has_class(header, "scrolled"));
    assert!(!page.surface().has_class(back, "visible"));
    Ok(())
}

#[test]
fn test_grid_children_reveal_staggered() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    page.surface_mut().set_scroll_top(1600.0);
    page.sample_intersections();

    let cards = page.surface().query_all(".project-card");
    assert!(cards.iter().all(|c| page.surface().has_class(*c, "visible")));

    page.advance_by(100);
    let delays: Vec<_> = cards
        .iter()
        .map(|c| page.surface().style(*c, "animation-delay"))
        .collect();
    assert_eq!(delays, vec![Some("0s"), Some("0.1s"), Some("0.2s")]);
    Ok(())
}

#[test]
fn test_lazy_image_loads_once_visible() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let img = element(&page, "img[data-src]")?;
    page.sample_intersections();
    assert_eq!(page.surface().attribute(img, "src"), None);

    page.surface_mut().set_scroll_top(700.0);
    page.sample_intersections();
    assert_eq!(
        page.surface().attribute(img, "src").as_deref(),
        Some("/img/portrait.jpg")
    );
    assert!(!page.surface().has_class(img, "lazy"));
    Ok(())
}

#[test]
fn test_lazy_image_ignores_reveal_margin() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let img = element(&page, "img[data-src]")?;

    // top 10px of the image sit inside the 50px band reveals ignore
    page.surface_mut().set_scroll_top(260.0);
    page.sample_intersections();
    assert_eq!(
        page.surface().attribute(img, "src").as_deref(),
        Some("/img/portrait.jpg")
    );
    assert!(!page.surface().has_class(img, "visible"));
    Ok(())
}
