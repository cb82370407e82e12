//! System message bus
//!
//! Modules subscribe a [`Listener`] together with the set of events it cares
//! about. Once per wake cycle the runtime merges every pending driver event
//! into one composite [`EventMask`] and calls [`MessageBus::dispatch`] exactly
//! once; each subscriber whose interest overlaps the message is called with
//! the whole message, in registration order.
//!
//! Listeners only get the application context, never the bus, so the
//! subscriber list cannot change while a dispatch is walking it. Module
//! handlers that need to (un)subscribe do so through
//! [`Control`](crate::runtime::Control) outside of dispatch.

use heapless::Vec;
use log::debug;

use crate::error::CoreError;
use crate::events::EventMask;

/// Maximum number of simultaneous subscriptions.
pub const MAX_SUBSCRIBERS: usize = 16;

/// Bus callback. The function pointer doubles as the subscriber identity for
/// [`MessageBus::unregister`].
pub type Listener<C> = fn(&mut C, EventMask);

struct Subscriber<C> {
    listener: Listener<C>,
    interest: EventMask,
}

pub struct MessageBus<C> {
    subscribers: Vec<Subscriber<C>, MAX_SUBSCRIBERS>,
}

impl<C> MessageBus<C> {
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Append a subscription.
    ///
    /// Registering the same listener twice is allowed and results in two
    /// calls per matching dispatch.
    pub fn register(
        &mut self,
        listener: Listener<C>,
        interest: EventMask,
    ) -> Result<(), CoreError> {
        self.subscribers
            .push(Subscriber { listener, interest })
            .map_err(|_| CoreError::BusFull {
                capacity: MAX_SUBSCRIBERS,
            })?;
        debug!(
            "Bus subscriber added for {:?} ({} total)",
            interest,
            self.subscribers.len()
        );
        Ok(())
    }

    /// Remove every subscription of `listener`. Unknown listeners are ignored.
    pub fn unregister(&mut self, listener: Listener<C>) {
        self.subscribers
            .retain(|s| !core::ptr::fn_addr_eq(s.listener, listener));
    }

    /// Deliver `message` to every interested subscriber.
    ///
    /// Returns how many listeners were called.
    pub fn dispatch(&self, ctx: &mut C, message: EventMask) -> usize {
        let mut delivered = 0;
        for subscriber in self.subscribers.iter() {
            if subscriber.interest.intersects(message) {
                (subscriber.listener)(ctx, message);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<C> Default for MessageBus<C> {
    fn default() -> Self {
        Self::new()
    }
}
