//! # Subscription guard: unregister on drop.
//!
//! [`Subscription`] is returned by [`Dispatcher::subscribe`](crate::Dispatcher::subscribe).
//! It removes the registration it created when dropped or when
//! [`unsubscribe`](Subscription::unsubscribe) is called.
//!
//! ## Rules
//! - The guard holds the table weakly; outliving the dispatcher is fine (drop becomes a no-op).
//! - The guard never keeps the handler alive; weak eviction still applies.
//! - Re-registering the same handler later replaces the registration; the old guard
//!   then no longer owns it and its drop leaves the new registration in place.

use std::fmt;
use std::sync::Weak;

use crate::core::table::{Detach, HandlerKey};

/// RAII registration handle.
#[must_use = "dropping a Subscription unregisters the handler immediately"]
pub struct Subscription {
    table: Option<Weak<dyn Detach>>,
    key: HandlerKey,
    generation: u64,
}

impl Subscription {
    pub(crate) fn new(table: Weak<dyn Detach>, key: HandlerKey, generation: u64) -> Self {
        Self {
            table: Some(table),
            key,
            generation,
        }
    }

    /// Unregisters now; returns `true` if this guard's registration was still present.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// True while the registration created by this guard is still in the table.
    ///
    /// Becomes `false` after explicit unregistration, dead-entry cleanup,
    /// re-registration of the same handler, or when the dispatcher is gone.
    pub fn is_active(&self) -> bool {
        self.table
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|table| table.is_attached(self.key, self.generation))
    }

    fn release(&mut self) -> bool {
        self.table
            .take()
            .and_then(|table| table.upgrade())
            .is_some_and(|table| table.detach(self.key, self.generation))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("generation", &self.generation)
            .field("active", &self.is_active())
            .finish()
    }
}
