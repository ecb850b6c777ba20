//! Controller test harness: the fixture page plus loose state, lent out one
//! closure at a time

use super::{Context, EventQueue, PageState};
use crate::config::Config;
use crate::store::MemoryStore;
use crate::surface::{MemorySurface, portfolio_page};

#[derive(Debug)]
pub struct Harness {
    pub surface: MemorySurface,
    pub store: MemoryStore,
    pub state: PageState,
    pub queue: EventQueue,
    pub config: Config,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_surface(portfolio_page())
    }

    pub fn with_surface(surface: MemorySurface) -> Self {
        Self {
            surface,
            store: MemoryStore::new(),
            state: PageState::new(),
            queue: EventQueue::new(),
            config: Config::default(),
        }
    }

    pub fn with_cx<R>(&mut self, f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        let mut cx = Context {
            surface: &mut self.surface,
            store: &mut self.store,
            state: &mut self.state,
            queue: &mut self.queue,
            config: &self.config,
        };
        f(&mut cx)
    }
}
