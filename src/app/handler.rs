//! Event dispatch and the virtual-time loop

use tracing::{debug, error};

use super::{Context, Controllers, Event, NotificationKind, Portfolio, ThemeMode, Timer};
use crate::controllers::{keyboard, nav, notify, reveal, Navigation};
use crate::error::Result;
use crate::store::PreferenceStore;
use crate::surface::{ElementId, Surface};

impl<S: Surface, P: PreferenceStore> Portfolio<S, P> {
    /// Handle one event now.
    ///
    /// Errors are logged and dropped; the page keeps running.
    pub fn dispatch(&mut self, event: Event) {
        let kind = event.kind();
        debug!(kind, "Dispatching event");
        if let Err(e) = self.handle(event) {
            error!(kind, error = %e, "Portfolio error");
        }
    }

    /// Queue an event behind those already waiting
    pub fn enqueue(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Handle queued events until none are left
    pub fn run_until_idle(&mut self) {
        while let Some(event) = self.queue.pop() {
            self.dispatch(event);
        }
    }

    /// Advance virtual time by `ms`, firing every timer that comes due
    pub fn advance_by(&mut self, ms: u64) {
        let until = self.queue.now_ms().saturating_add(ms);
        self.advance_to(until);
    }

    /// Advance virtual time to `until`, firing every timer due by then in
    /// due order
    pub fn advance_to(&mut self, until: u64) {
        self.run_until_idle();
        while let Some(timer) = self.queue.pop_due(until) {
            self.dispatch(Event::Timer(timer));
            self.run_until_idle();
        }
        self.queue.set_now(until);
    }

    /// Compute visibility of every watched element from the page geometry
    /// and feed it in as intersection events.
    ///
    /// Hosts without a real observer call this after the viewport moves.
    pub fn sample_intersections(&mut self) {
        let reveals = self.config.reveal_visibility();
        for target in self.pending_reveals() {
            let ratio = self.visible_ratio(target, reveals.bottom_margin);
            if ratio > 0.0 {
                self.queue.push(Event::Intersection { target, ratio });
            }
        }
        let images = self.config.lazy_image_visibility();
        for target in self.pending_images() {
            let ratio = self.visible_ratio(target, images.bottom_margin);
            if ratio > 0.0 {
                self.queue.push(Event::ImageIntersection { target, ratio });
            }
        }
        self.run_until_idle();
    }

    fn visible_ratio(&self, target: ElementId, bottom_margin: f64) -> f64 {
        let metrics = self.surface.scroll_metrics();
        reveal::intersection_ratio(
            self.surface.offset_top(target),
            self.surface.offset_height(target),
            metrics.scroll_top,
            metrics.viewport_height,
            bottom_margin,
        )
    }

    /// Whether the host should cancel the browser's default action for a
    /// click on `target`: in-page anchors scroll here instead of jumping
    #[must_use]
    pub fn intercepts_click(&self, target: ElementId) -> bool {
        nav::is_in_page_anchor(&self.surface, &self.config.selectors.anchors, target)
    }

    /// Whether a submit event from `target` belongs to the contact form.
    ///
    /// Other forms on the page keep their native submission.
    #[must_use]
    pub fn owns_submit(&self, target: ElementId) -> bool {
        self.controllers
            .form
            .as_ref()
            .is_some_and(|form| form.owns(&self.surface, target))
    }

    /// Flip the theme, as the toggle button does
    pub fn toggle_theme(&mut self) {
        let (mut cx, c) = self.parts();
        let Some(theme) = c.theme else {
            debug!("Theme controller not running");
            return;
        };
        if let Err(e) = theme.toggle_theme(&mut cx) {
            error!(error = %e, "Portfolio error");
        }
    }

    /// Apply and persist an explicit theme
    pub fn set_theme(&mut self, mode: ThemeMode) {
        let (mut cx, c) = self.parts();
        let Some(theme) = c.theme else {
            debug!("Theme controller not running");
            return;
        };
        if let Err(e) = theme.set_theme(&mut cx, mode) {
            error!(error = %e, "Portfolio error");
        }
    }

    /// Open or close the mobile menu
    pub fn toggle_mobile_menu(&mut self) {
        let (mut cx, c) = self.parts();
        if let Some(menu) = c.menu {
            menu.toggle(&mut cx);
        }
    }

    /// Smooth-scroll to the top of the page
    pub fn scroll_to_top(&mut self) {
        let (mut cx, _) = self.parts();
        nav::scroll_to_top(&mut cx);
        self.queue.push(Event::ScrollChanged);
        self.run_until_idle();
    }

    /// Show a toast; returns the notification element
    pub fn show_notification(
        &mut self,
        message: &str,
        kind: NotificationKind,
    ) -> Option<ElementId> {
        let (mut cx, _) = self.parts();
        notify::show(&mut cx, message, kind)
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        let (mut cx, c) = self.parts();
        match event {
            Event::ScrollChanged => {
                if let Some(scroll) = c.scroll.as_mut() {
                    scroll.on_scroll(&mut cx);
                }
            }
            Event::FieldBlurred(field) => {
                if let Some(form) = c.form.as_ref() {
                    form.on_blur(&mut cx, field);
                }
            }
            Event::FieldInput { field, value } => {
                if let Some(form) = c.form.as_ref() {
                    form.on_input(&mut cx, field, &value);
                }
            }
            Event::SubmitRequested => {
                if let Some(form) = c.form.as_mut() {
                    form.submit(&mut cx);
                }
            }
            Event::Click(target) => click(&mut cx, c, target)?,
            Event::PointerDown => keyboard::on_pointer_down(&mut cx),
            Event::KeyPressed(key) => {
                keyboard::on_key(&mut cx, &key);
                if let Some(menu) = c.menu {
                    menu.on_key(&mut cx, &key);
                }
            }
            Event::SystemThemeChanged { dark } => {
                if let Some(theme) = c.theme {
                    theme.on_system_change(&mut cx, dark);
                }
            }
            Event::Intersection { target, ratio } => {
                if let Some(reveal) = c.reveal.as_mut() {
                    reveal.on_intersection(&mut cx, target, ratio);
                }
            }
            Event::ImageIntersection { target, ratio } => {
                if let Some(reveal) = c.reveal.as_mut() {
                    reveal.on_image_intersection(&mut cx, target, ratio);
                }
            }
            Event::Timer(timer) => fire(&mut cx, c, timer),
        }
        Ok(())
    }
}

/// Route a click to every controller that cares, innermost first
fn click(cx: &mut Context<'_>, c: &mut Controllers, target: ElementId) -> Result<()> {
    notify::handle_click(cx, target);

    let toggled = match c.theme {
        Some(theme) => theme.on_click(cx, target),
        None => Ok(false),
    };

    if let Some(button) = c.scroll.as_ref().and_then(|s| s.back_to_top())
        && cx.surface.contains(button, target)
    {
        nav::scroll_to_top(cx);
        cx.queue.push(Event::ScrollChanged);
    }

    if let Some(navigation) = c.navigation
        && let Some(jump) = navigation.resolve(cx, target)
    {
        if cx.state.menu_open
            && let Some(menu) = c.menu
        {
            menu.toggle(cx);
        }
        Navigation::jump(cx, jump);
        cx.queue.push(Event::ScrollChanged);
    }

    if let Some(menu) = c.menu {
        menu.on_click(cx, target);
    }
    toggled.map(|_| ())
}

fn fire(cx: &mut Context<'_>, c: &mut Controllers, timer: Timer) {
    match timer {
        Timer::ScrollSettled => {
            if let Some(scroll) = c.scroll.as_mut() {
                scroll.settle(cx);
            }
        }
        Timer::SubmissionComplete => {
            if let Some(form) = c.form.as_mut() {
                form.complete(cx);
            }
        }
        Timer::NotificationEnter(el) => notify::enter(cx, el),
        Timer::NotificationExpire(el) => notify::expire(cx, el),
        Timer::NotificationRemove(el) => notify::remove(cx, el),
        Timer::RevealStagger { target, index } => reveal::stagger(cx, target, index),
    }
}
