//! # Builder for [`Dispatcher`].
//!
//! Starts from a [`DispatcherConfig`] and overrides individual settings before
//! producing an empty dispatcher.

use std::borrow::Cow;
use std::marker::PhantomData;

use crate::core::{Dispatcher, DispatcherConfig};

/// Builder for constructing a [`Dispatcher`] with non-default settings.
///
/// ```
/// use weakcast::AsyncEvent;
///
/// let ev = AsyncEvent::builder()
///     .name("order_placed")
///     .max_concurrent(4)
///     .build();
/// assert_eq!(ev.name(), "order_placed");
/// ```
pub struct DispatcherBuilder<H: ?Sized> {
    cfg: DispatcherConfig,
    _handler: PhantomData<fn(&H)>,
}

impl<H> DispatcherBuilder<H>
where
    H: ?Sized + Send + Sync + 'static,
{
    /// Creates a new builder starting from the given configuration.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self {
            cfg,
            _handler: PhantomData,
        }
    }

    /// Sets the label attached to log records.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Limits how many handlers run at once within one `invoke` (`0` = unlimited).
    pub fn max_concurrent(mut self, limit: usize) -> Self {
        self.cfg.max_concurrent = limit;
        self
    }

    /// Chooses whether handler panics are caught and reported as failures.
    pub fn isolate_panics(mut self, isolate: bool) -> Self {
        self.cfg.isolate_panics = isolate;
        self
    }

    /// Builds an empty dispatcher.
    pub fn build(self) -> Dispatcher<H> {
        Dispatcher::with_config(self.cfg)
    }
}

impl<H: ?Sized> std::fmt::Debug for DispatcherBuilder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("cfg", &self.cfg)
            .finish()
    }
}
