//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the settings of a single dispatcher instance.
//! Configuration is passed explicitly at construction; there is no global state.
//!
//! ## Sentinel values
//! - `max_concurrent = 0` → unlimited (no semaphore created)

use std::borrow::Cow;

/// Configuration for one dispatcher.
///
/// ## Field semantics
/// - `name`: label attached to every log record of this dispatcher
/// - `max_concurrent`: handler invocations allowed to run at once within one `invoke` (`0` = unlimited)
/// - `isolate_panics`: catch handler panics and report them as failures instead of unwinding into `invoke`
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Dispatcher label used in logs (usually the event name).
    pub name: Cow<'static, str>,

    /// Maximum number of handler invocations running concurrently.
    ///
    /// - `0` = unlimited (every live handler starts at once)
    /// - `n > 0` = at most `n` handlers run simultaneously; the rest wait for a permit
    ///
    /// Every live handler is still invoked and awaited.
    pub max_concurrent: usize,

    /// Catch panics raised by handlers.
    ///
    /// - `true`: a panic becomes `HandlerError::Panicked` in the aggregate; siblings finish normally
    /// - `false`: the panic resumes unwinding through `invoke`
    pub isolate_panics: bool,
}

impl DispatcherConfig {
    /// Returns the concurrency limit as an `Option`.
    ///
    /// - `None` → unlimited (no semaphore)
    /// - `Some(n)` → at most `n` concurrent handler invocations
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.max_concurrent == 0 {
            None
        } else {
            Some(self.max_concurrent)
        }
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `name = "event"`
    /// - `max_concurrent = 0` (unlimited)
    /// - `isolate_panics = true`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("event"),
            max_concurrent: 0,
            isolate_panics: true,
        }
    }
}
