//! Browser host
//!
//! Binds the controllers to the live document through `web-sys`. DOM events
//! become [`Event`]s and `IntersectionObserver`s feed reveals and lazy
//! images. Timers are pumped with `setTimeout`; `window.Portfolio` exposes
//! the page actions.
//! Only compiled on `wasm32` targets.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::io;

use js_sys::{Array, Object, Reflect};
use tracing::{debug, error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MediaQueryListEvent, Node, ScrollToOptions, Storage,
    Window,
};

use crate::app::{Event, Key, NotificationKind, Portfolio};
use crate::config::{Config, Visibility};
use crate::controllers::validate::Field;
use crate::error::StoreError;
use crate::store::PreferenceStore;
use crate::surface::{ElementId, Handles, ScrollBehavior, ScrollMetrics, Surface};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const ID_ATTR: &str = "data-folio-id";

type Page = Portfolio<BrowserSurface, LocalStore>;

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    static ORIGIN_MS: Cell<f64> = const { Cell::new(0.0) };
    static TIMEOUT: Cell<Option<i32>> = const { Cell::new(None) };
}

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.location().map_or_else(
                || format!("panic: {info}"),
                |loc| format!("panic at {}:{}:{}: {info}", loc.file(), loc.line(), loc.column()),
            );
            console_error(&msg);
        }));
    });
}

/// Line-buffered writer that forwards formatted log records to the console
struct ConsoleWriter(Vec<u8>);

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.0.is_empty() {
            console_error(String::from_utf8_lossy(&self.0).trim_end());
            self.0.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

fn install_logging() {
    // no wall clock on wasm32-unknown-unknown
    let _ = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter(Vec::new()))
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .try_init();
}

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// [`Surface`] over the live document.
///
/// Elements are interned on first sight: each gets a `data-folio-id` stamp
/// that keys its handle in the table. Removing an element through the
/// surface drops it and its stamped descendants from the table.
#[derive(Debug)]
struct BrowserSurface {
    window: Window,
    document: Document,
    elements: RefCell<Handles<Element>>,
    scratch: ElementId,
}

impl BrowserSurface {
    fn new(window: Window, document: Document) -> Result<Self, JsValue> {
        // stands in for elements the document refuses to create
        let scratch = document.create_element("div")?;
        let mut elements = Handles::new();
        let scratch = elements.insert(scratch);
        Ok(Self {
            window,
            document,
            elements: RefCell::new(elements),
            scratch,
        })
    }

    fn stamp_of(el: &Element) -> Option<usize> {
        el.get_attribute(ID_ATTR)?.parse().ok()
    }

    fn intern(&self, el: Element) -> ElementId {
        let node: &Node = &el;
        let known = self
            .elements
            .borrow()
            .find(Self::stamp_of(&el), |h| h.is_same_node(Some(node)));
        if let Some(id) = known {
            return id;
        }
        let id = self.elements.borrow_mut().insert(el.clone());
        if let Err(err) = el.set_attribute(ID_ATTR, &id.index().to_string()) {
            debug!(error = %js_error(&err), "stamp element failed");
        }
        id
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id).cloned()
    }

    /// Drop `el` and every stamped element under it from the table
    fn forget(&self, el: &Element) {
        let mut gone: Vec<usize> = Self::stamp_of(el).into_iter().collect();
        if let Ok(list) = el.query_selector_all(&format!("[{ID_ATTR}]")) {
            gone.extend(
                (0..list.length())
                    .filter_map(|i| list.get(i))
                    .filter_map(|node| node.dyn_into::<Element>().ok())
                    .filter_map(|child| Self::stamp_of(&child)),
            );
        }
        let dropped = self.elements.borrow_mut().forget(gone);
        debug!(dropped, "Forgot removed elements");
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn collect(&self, list: Option<web_sys::NodeList>) -> Vec<ElementId> {
        let Some(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }
}

impl Surface for BrowserSurface {
    fn body(&self) -> Option<ElementId> {
        self.document.body().map(|b| self.intern(b.into()))
    }

    fn head(&self) -> Option<ElementId> {
        self.query("head")
    }

    fn query(&self, selector: &str) -> Option<ElementId> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(|el| self.intern(el))
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.collect(self.document.query_selector_all(selector).ok())
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let list = self
            .element(root)
            .and_then(|el| el.query_selector_all(selector).ok());
        self.collect(list)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.document
            .get_element_by_id(id)
            .map(|el| self.intern(el))
    }

    fn matches(&self, el: ElementId, selector: &str) -> bool {
        self.element(el)
            .is_some_and(|e| e.matches(selector).unwrap_or(false))
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.element(el)
            .and_then(|e| e.parent_element())
            .map(|p| self.intern(p))
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        let Some(children) = self.element(el).map(|e| e.children()) else {
            return Vec::new();
        };
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|child| self.intern(child))
            .collect()
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(a), Some(n)) => {
                let node: &Node = &n;
                a.contains(Some(node))
            }
            _ => false,
        }
    }

    fn is_attached(&self, el: ElementId) -> bool {
        self.element(el).is_some_and(|e| e.is_connected())
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el)
            && let Err(err) = e.class_list().add_1(class)
        {
            debug!(class, error = %js_error(&err), "add class failed");
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el)
            && let Err(err) = e.class_list().remove_1(class)
        {
            debug!(class, error = %js_error(&err), "remove class failed");
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(html) = self.html(el) else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            debug!(property, error = %js_error(&err), "set style failed");
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el).and_then(|e| e.get_attribute(name))
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element(el)
            && let Err(err) = e.set_attribute(name, value)
        {
            debug!(name, error = %js_error(&err), "set attribute failed");
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(e) = self.element(el) {
            e.set_text_content(Some(text));
        }
    }

    fn value(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|e| Reflect::get(&e, &"value".into()).ok())
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn set_value(&mut self, el: ElementId, value: &str) {
        if let Some(e) = self.element(el) {
            let _ = Reflect::set(&e, &"value".into(), &JsValue::from_str(value));
        }
    }

    fn set_disabled(&mut self, el: ElementId, disabled: bool) {
        if let Some(e) = self.element(el) {
            let _ = Reflect::set(&e, &"disabled".into(), &JsValue::from_bool(disabled));
        }
    }

    fn create_element(&mut self, tag: &str, parent: ElementId) -> ElementId {
        let created = self.document.create_element(tag).and_then(|el| {
            if let Some(p) = self.element(parent) {
                p.append_child(&el)?;
            }
            Ok(el)
        });
        match created {
            Ok(el) => self.intern(el),
            Err(err) => {
                warn!(tag, error = %js_error(&err), "create element failed");
                self.scratch
            }
        }
    }

    fn remove(&mut self, el: ElementId) {
        if let Some(e) = self.element(el) {
            e.remove();
            self.forget(&e);
        }
    }

    fn offset_top(&self, el: ElementId) -> f64 {
        self.html(el).map_or(0.0, |h| f64::from(h.offset_top()))
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.html(el).map_or(0.0, |h| f64::from(h.offset_height()))
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.window.scroll_y().unwrap_or(0.0),
            document_height: self
                .document
                .body()
                .map_or(0.0, |b| f64::from(b.offset_height())),
            viewport_height: self
                .window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(0.0),
        }
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.window
            .match_media(DARK_QUERY)
            .ok()
            .flatten()
            .is_some_and(|q| q.matches())
    }
}

/// `localStorage`-backed preferences
#[derive(Debug)]
struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(js_error(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(js_error(&e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(js_error(&e)))
    }
}

fn elapsed_ms() -> u64 {
    let elapsed = js_sys::Date::now() - ORIGIN_MS.with(Cell::get);
    if elapsed.is_finite() && elapsed > 0.0 {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "checked finite and positive; page lifetimes fit in u64 ms"
        )]
        let ms = elapsed as u64;
        ms
    } else {
        0
    }
}

/// Run `f` against the page with the clock caught up, then re-arm the pump
fn with_page<R>(f: impl FnOnce(&mut Page) -> R) -> Option<R> {
    let result = PAGE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            warn!("Page busy; dropping re-entrant call");
            return None;
        };
        let page = slot.as_mut()?;
        page.advance_to(elapsed_ms());
        let out = f(page);
        page.run_until_idle();
        Some(out)
    });
    arm_timer();
    result
}

fn dispatch(event: Event) {
    with_page(|page| page.dispatch(event));
}

fn arm_timer() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(previous) = TIMEOUT.with(Cell::take) {
        window.clear_timeout_with_handle(previous);
    }
    let next = PAGE.with(|cell| {
        cell.try_borrow_mut().ok().and_then(|mut slot| {
            slot.as_mut()
                .and_then(|page| page.next_delay(elapsed_ms()))
        })
    });
    let Some(delay) = next else {
        return;
    };
    let pump = Closure::once_into_js(|| {
        TIMEOUT.with(|t| t.set(None));
        with_page(|_| ());
    });
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(pump.unchecked_ref(), delay)
    {
        Ok(handle) => TIMEOUT.with(|t| t.set(Some(handle))),
        Err(e) => error!(error = %js_error(&e), "Failed to schedule timer"),
    }
}

fn intern(el: Element) -> Option<ElementId> {
    PAGE.with(|cell| {
        cell.try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(|page| page.surface().intern(el)))
    })
}

fn intern_target(event: &web_sys::Event) -> Option<ElementId> {
    intern(event.target()?.dyn_into::<Element>().ok()?)
}

fn field_of(event: &web_sys::Event) -> Option<(Field, ElementId)> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let field = Field::from_name(&target.get_attribute("name")?)?;
    let form = PAGE.with(|cell| {
        cell.try_borrow().ok().and_then(|slot| {
            slot.as_ref().map(|page| {
                let surface = page.surface();
                let el = surface.intern(target);
                surface
                    .closest(el, &page.config().selectors.contact_form)
                    .map(|_| el)
            })
        })
    });
    form.flatten().map(|el| (field, el))
}

fn listen(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_events(window: &Window, document: &Document) -> Result<(), JsValue> {
    listen(document, "click", |event| {
        let Some(target) = intern_target(&event) else {
            return;
        };
        with_page(|page| {
            if page.intercepts_click(target) {
                event.prevent_default();
            }
            page.dispatch(Event::Click(target));
        });
    })?;
    listen(document, "submit", |event| {
        let Some(target) = intern_target(&event) else {
            return;
        };
        with_page(|page| {
            if page.owns_submit(target) {
                event.prevent_default();
                page.dispatch(Event::SubmitRequested);
            }
        });
    })?;
    listen(document, "input", |event| {
        if let Some((field, el)) = field_of(&event) {
            with_page(|page| {
                let value = page.surface().value(el);
                page.dispatch(Event::FieldInput { field, value });
            });
        }
    })?;
    // blur does not bubble
    listen(document, "focusout", |event| {
        if let Some((field, _)) = field_of(&event) {
            dispatch(Event::FieldBlurred(field));
        }
    })?;
    listen(document, "keydown", |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            dispatch(Event::KeyPressed(Key::from_dom(&key.key())));
        }
    })?;
    listen(document, "mousedown", |_| dispatch(Event::PointerDown))?;
    listen(window, "scroll", |_| dispatch(Event::ScrollChanged))?;
    listen(window, "error", |event| {
        let detail = Reflect::get(&event, &"error".into())
            .map(|e| js_error(&e))
            .unwrap_or_default();
        console_error(&format!("Portfolio error: {detail}"));
    })?;

    if let Some(query) = window.match_media(DARK_QUERY)? {
        listen(&query, "change", |event| {
            if let Some(change) = event.dyn_ref::<MediaQueryListEvent>() {
                dispatch(Event::SystemThemeChanged {
                    dark: change.matches(),
                });
            }
        })?;
    }
    Ok(())
}

/// Watch `pending(page)` with one observer, turning hits into `event`s.
///
/// Only entries that fired are checked for unobserving.
fn observe(
    visibility: Visibility,
    pending: fn(&Page) -> Vec<ElementId>,
    event: fn(ElementId, f64) -> Event,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let seen: Vec<(ElementId, f64, Element)> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter(IntersectionObserverEntry::is_intersecting)
                .filter_map(|entry| {
                    let el = entry.target();
                    let id = intern(el.clone())?;
                    Some((id, entry.intersection_ratio(), el))
                })
                .collect();
            if seen.is_empty() {
                return;
            }
            with_page(|page| {
                for (target, ratio, _) in &seen {
                    page.dispatch(event(*target, *ratio));
                }
                let still: BTreeSet<ElementId> = pending(page).into_iter().collect();
                for (target, _, el) in &seen {
                    if !still.contains(target) {
                        observer.unobserve(el);
                    }
                }
            });
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(visibility.threshold));
    init.set_root_margin(&visibility.root_margin());
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    PAGE.with(|cell| {
        if let Ok(slot) = cell.try_borrow()
            && let Some(page) = slot.as_ref()
        {
            for id in pending(page) {
                if let Some(el) = page.surface().element(id) {
                    observer.observe(&el);
                }
            }
        }
    });
    Ok(())
}

fn observe_reveals(config: &Config) -> Result<(), JsValue> {
    observe(
        config.reveal_visibility(),
        Page::pending_reveals,
        |target, ratio| Event::Intersection { target, ratio },
    )?;
    observe(
        config.lazy_image_visibility(),
        Page::pending_images,
        |target, ratio| Event::ImageIntersection { target, ratio },
    )
}

fn set_js(obj: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), value);
}

fn export_globals(window: &Window) {
    let api = Object::new();
    set_js(
        &api,
        "toggleTheme",
        &Closure::<dyn FnMut()>::new(|| {
            with_page(Page::toggle_theme);
        })
        .into_js_value(),
    );
    set_js(
        &api,
        "toggleMobileMenu",
        &Closure::<dyn FnMut()>::new(|| {
            with_page(Page::toggle_mobile_menu);
        })
        .into_js_value(),
    );
    set_js(
        &api,
        "scrollToTop",
        &Closure::<dyn FnMut()>::new(|| {
            with_page(Page::scroll_to_top);
        })
        .into_js_value(),
    );
    set_js(
        &api,
        "showNotification",
        &Closure::<dyn FnMut(String, Option<String>)>::new(
            |message: String, kind: Option<String>| {
                let kind = kind.as_deref().map_or(NotificationKind::Info, NotificationKind::parse_lenient);
                with_page(|page| page.show_notification(&message, kind));
            },
        )
        .into_js_value(),
    );
    set_js(window, "Portfolio", &api.into());
}

fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    ORIGIN_MS.with(|o| o.set(js_sys::Date::now()));
    let config = Config::default();
    let surface = BrowserSurface::new(window.clone(), document.clone())?;
    let store = LocalStore::new(&window);
    let page = Portfolio::new(surface, store, config.clone());
    PAGE.with(|cell| *cell.borrow_mut() = Some(page));

    wire_events(&window, &document)?;
    if let Err(e) = observe_reveals(&config) {
        error!(error = %js_error(&e), "Reveal observer unavailable");
    }
    export_globals(&window);
    arm_timer();
    Ok(())
}

/// Module entry point: start once the document has been parsed
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    install_logging();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let state = Reflect::get(&document, &"readyState".into())
        .ok()
        .and_then(|s| s.as_string());
    if state.as_deref() == Some("loading") {
        let ready = Closure::once_into_js(|| {
            if let Err(e) = boot() {
                console_error(&format!("Portfolio error: {}", js_error(&e)));
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
        return Ok(());
    }
    boot()
}
