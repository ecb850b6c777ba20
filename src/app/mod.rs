//! Page bootstrap, state and event loop

mod context;
mod event;
mod handler;
mod queue;
mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::Context;
pub use event::{Event, Key, Timer};
pub use queue::{EventQueue, TimerId};
pub use state::{
    ContactSubmission, FormPhase, FormState, NotificationKind, NotificationState, PageState,
    ScrollDerived, ThemeMode,
};

use tracing::{debug, error, info};

use crate::config::Config;
use crate::controllers::{
    styles, ContactForm, MobileMenu, Navigation, Reveal, ScrollEffects, ThemeController,
};
use crate::error::Result;
use crate::store::PreferenceStore;
use crate::surface::{ElementId, Surface};

/// Controllers that found their hooks at startup
#[derive(Debug, Default)]
struct Controllers {
    navigation: Option<Navigation>,
    theme: Option<ThemeController>,
    reveal: Option<Reveal>,
    menu: Option<MobileMenu>,
    form: Option<ContactForm>,
    scroll: Option<ScrollEffects>,
}

/// The page behavior layer: one surface, one store, one state, one queue.
///
/// Construction runs every controller's startup. A controller that fails is
/// logged and left out; the rest still start.
#[derive(Debug)]
pub struct Portfolio<S, P> {
    surface: S,
    store: P,
    state: PageState,
    queue: EventQueue,
    config: Config,
    controllers: Controllers,
}

impl<S: Surface, P: PreferenceStore> Portfolio<S, P> {
    /// Start the page with fresh state
    #[must_use]
    pub fn new(surface: S, store: P, config: Config) -> Self {
        Self::with_state(surface, store, config, PageState::new())
    }

    /// Start the page with caller-provided state
    #[must_use]
    pub fn with_state(surface: S, store: P, config: Config, state: PageState) -> Self {
        let mut portfolio = Self {
            surface,
            store,
            state,
            queue: EventQueue::new(),
            config,
            controllers: Controllers::default(),
        };
        portfolio.start();
        portfolio
    }

    fn start(&mut self) {
        let (mut cx, c) = self.parts();
        styles::inject(cx.surface);

        c.navigation = isolate("navigation", Navigation::init(&mut cx));
        c.theme = isolate("theme", ThemeController::init(&mut cx));
        c.reveal = isolate("reveal", Reveal::init(&mut cx));
        c.menu = isolate("mobile menu", MobileMenu::init(&mut cx));
        c.form = isolate("contact form", ContactForm::init(&mut cx));
        c.scroll = isolate("scroll effects", ScrollEffects::init(&mut cx));

        info!(
            theme = %cx.state.theme,
            navigation = c.navigation.is_some(),
            reveal = c.reveal.is_some(),
            menu = c.menu.is_some(),
            form = c.form.is_some(),
            scroll = c.scroll.is_some(),
            "Portfolio initialized"
        );
    }

    fn parts(&mut self) -> (Context<'_>, &mut Controllers) {
        (
            Context {
                surface: &mut self.surface,
                store: &mut self.store,
                state: &mut self.state,
                queue: &mut self.queue,
                config: &self.config,
            },
            &mut self.controllers,
        )
    }

    /// The page
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The page, for hosts that move it (scroll, layout)
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The preference store
    #[must_use]
    pub const fn store(&self) -> &P {
        &self.store
    }

    /// Current page state
    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Current virtual time
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.queue.now_ms()
    }

    /// Timers still waiting to fire
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.queue.pending_timers()
    }

    /// Due time of the next timer, if any
    pub fn next_due(&mut self) -> Option<u64> {
        self.queue.next_due()
    }

    /// Reveal targets still hidden
    #[must_use]
    pub fn pending_reveals(&self) -> Vec<ElementId> {
        self.controllers
            .reveal
            .as_ref()
            .map(Reveal::pending_reveals)
            .unwrap_or_default()
    }

    /// Lazy images not loaded yet
    #[must_use]
    pub fn pending_images(&self) -> Vec<ElementId> {
        self.controllers
            .reveal
            .as_ref()
            .map(Reveal::pending_images)
            .unwrap_or_default()
    }

    /// Milliseconds a host timer should wait, from `now_ms`, before the next
    /// timer comes due
    pub fn next_delay(&mut self, now_ms: u64) -> Option<i32> {
        self.queue
            .next_due()
            .map(|due| queue::host_delay(due, now_ms))
    }

    /// Whether the theme toggle exists
    #[must_use]
    pub fn has_theme_toggle(&self) -> bool {
        self.controllers
            .theme
            .is_some_and(|theme| theme.toggle().is_some())
    }
}

/// Keep a controller that started, log one that did not
fn isolate<T>(controller: &'static str, started: Result<Option<T>>) -> Option<T> {
    match started {
        Ok(Some(ready)) => Some(ready),
        Ok(None) => {
            debug!(controller, "Hook absent; feature disabled");
            None
        }
        Err(e) => {
            error!(controller, error = %e, "Controller failed to start");
            None
        }
    }
}
