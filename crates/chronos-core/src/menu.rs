//! Ring of registered modules
//!
//! Every application module registers once at start-up with a name and a
//! set of optional handlers. Entries form a fixed circular doubly-linked ring
//! (stored by index in a `heapless::Vec`). New entries are inserted right
//! before the head, so iterating `next` from the first module visits modules
//! in registration order. The ring never shrinks.
//!
//! The first module registered becomes the current one and is activated
//! immediately, making it the default screen.

use heapless::Vec;
use log::info;

use crate::error::CoreError;
use crate::runtime::Control;

/// Maximum number of modules in the ring.
pub const MAX_MODULES: usize = 12;

/// Module callback. Handlers get the application context plus a
/// [`Control`] handle for bus subscriptions and edit mode.
pub type Handler<C> = fn(&mut C, &mut Control<'_, C>);

/// Capability set of a module. Every capability is optional.
pub struct ModuleHandlers<C> {
    pub up: Option<Handler<C>>,
    pub down: Option<Handler<C>>,
    /// Short press of the function button
    pub function: Option<Handler<C>>,
    /// Long press of the settings button; binding it reserves the short
    /// settings press, so the menu cannot be opened from this module
    pub long_settings: Option<Handler<C>>,
    /// Long press of the function button; binding it reserves the short
    /// function press
    pub long_function: Option<Handler<C>>,
    /// Up and down pressed together
    pub up_down: Option<Handler<C>>,
    pub activate: Option<Handler<C>>,
    pub deactivate: Option<Handler<C>>,
}

impl<C> ModuleHandlers<C> {
    pub const fn new() -> Self {
        Self {
            up: None,
            down: None,
            function: None,
            long_settings: None,
            long_function: None,
            up_down: None,
            activate: None,
            deactivate: None,
        }
    }

    pub const fn on_up(mut self, handler: Handler<C>) -> Self {
        self.up = Some(handler);
        self
    }

    pub const fn on_down(mut self, handler: Handler<C>) -> Self {
        self.down = Some(handler);
        self
    }

    pub const fn on_function(mut self, handler: Handler<C>) -> Self {
        self.function = Some(handler);
        self
    }

    pub const fn on_long_settings(mut self, handler: Handler<C>) -> Self {
        self.long_settings = Some(handler);
        self
    }

    pub const fn on_long_function(mut self, handler: Handler<C>) -> Self {
        self.long_function = Some(handler);
        self
    }

    pub const fn on_up_down(mut self, handler: Handler<C>) -> Self {
        self.up_down = Some(handler);
        self
    }

    pub const fn on_activate(mut self, handler: Handler<C>) -> Self {
        self.activate = Some(handler);
        self
    }

    pub const fn on_deactivate(mut self, handler: Handler<C>) -> Self {
        self.deactivate = Some(handler);
        self
    }
}

impl<C> Default for ModuleHandlers<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ModuleHandlers<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ModuleHandlers<C> {}

/// A module as it appears in the ring.
pub struct Module<C> {
    /// Short label shown while navigating the menu
    pub name: &'static str,
    pub handlers: ModuleHandlers<C>,
}

impl<C> Module<C> {
    pub const fn new(name: &'static str, handlers: ModuleHandlers<C>) -> Self {
        Self { name, handlers }
    }
}

impl<C> Clone for Module<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Module<C> {}

/// Ring traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

struct MenuEntry<C> {
    module: Module<C>,
    next: usize,
    prev: usize,
}

/// The module ring plus the pointer to the current entry.
pub struct MenuRing<C> {
    entries: Vec<MenuEntry<C>, MAX_MODULES>,
    current: Option<usize>,
}

impl<C> MenuRing<C> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: None,
        }
    }

    /// Insert `module` before the head of the ring.
    ///
    /// Returns `true` when this was the first module, which then becomes
    /// current; the caller is responsible for firing its `activate` handler.
    pub fn add_entry(&mut self, module: Module<C>) -> Result<bool, CoreError> {
        let index = self.entries.len();
        let name = module.name;

        let (next, prev) = match self.entries.first() {
            // Head is entry 0; its prev is the tail.
            Some(head) => (0, head.prev),
            None => (index, index),
        };

        self.entries
            .push(MenuEntry { module, next, prev })
            .map_err(|_| CoreError::RingFull {
                capacity: MAX_MODULES,
            })?;

        if index == 0 {
            self.current = Some(0);
            info!("Module '{}' registered as default screen", name);
            return Ok(true);
        }

        self.entries[0].prev = index;
        self.entries[prev].next = index;
        info!("Module '{}' registered ({} in ring)", name, self.entries.len());
        Ok(false)
    }

    /// Move the current pointer one step around the ring.
    ///
    /// A no-op on an empty ring.
    pub fn advance(&mut self, direction: Direction) {
        if let Some(index) = self.current {
            let entry = &self.entries[index];
            self.current = Some(match direction {
                Direction::Next => entry.next,
                Direction::Prev => entry.prev,
            });
        }
    }

    pub fn current(&self) -> Option<&Module<C>> {
        self.current.map(|i| &self.entries[i].module)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current().map(|m| m.name)
    }

    /// Point the ring at `index`, ignoring indices that were never registered.
    pub fn set_current(&mut self, index: usize) {
        if index < self.entries.len() {
            self.current = Some(index);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Module<C>> {
        self.entries.get(index).map(|e| &e.module)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for MenuRing<C> {
    fn default() -> Self {
        Self::new()
    }
}
