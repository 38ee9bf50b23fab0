//! # Dispatcher: the shared engine behind every event arity.
//!
//! [`Dispatcher<H>`] keeps a de-duplicated table of weakly-held handlers of type
//! `H` (a handler trait object) and fans one notification out to every live one.
//! The arity-specific `invoke` methods live in the `events` module; everything
//! else is here.
//!
//! ## Invocation pass
//! ```text
//! invoke(args.., ctx)
//!     │
//!     ├─► snapshot table: upgrade every Weak
//!     │       ├─ live  → collect Arc<H>
//!     │       └─ dead  → count
//!     ├─► dead > 0 ? purge_dead()            (retain live entries only)
//!     ├─► one future per live handler        (ctx cloned, args borrowed)
//!     │       └─ optional semaphore permit, optional catch_unwind
//!     ├─► join_all                            (fan-out / fan-in, no short-circuit)
//!     └─► failures.is_empty() ? Ok(()) : Err(HandlersFailed { total, failures })
//! ```
//!
//! ## Rules
//! - The table stores `Weak<H>` only; registering never extends a handler's lifetime.
//! - Registering the same `Arc` allocation twice keeps a single entry.
//! - The snapshot is taken once per pass: handlers registered after it are not notified by that pass.
//! - No table guard is held while handler code runs, so handlers may (un)register re-entrantly.
//! - Cancellation is passed through; the dispatcher never aborts a handler.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::core::builder::DispatcherBuilder;
use crate::core::config::DispatcherConfig;
use crate::core::subscription::Subscription;
use crate::core::table::{Detach, HandlerKey, Snapshot, Table};
use crate::error::{DispatchError, HandlerError, HandlerFailure};
use crate::handlers::Describe;

/// Future returned by one handler invocation.
pub(crate) type HandlerFuture<'a> = BoxFuture<'a, Result<(), HandlerError>>;

/// Asynchronous multi-subscriber dispatcher over weakly-held handlers of type `H`.
///
/// Use it through the arity aliases [`AsyncEvent`](crate::AsyncEvent),
/// [`AsyncEventWithArgs`](crate::AsyncEventWithArgs) and
/// [`AsyncEventWithSender`](crate::AsyncEventWithSender).
///
/// All methods take `&self` and are safe to call concurrently from many threads.
pub struct Dispatcher<H: ?Sized> {
    table: Arc<Table<H>>,
    cfg: DispatcherConfig,
}

impl<H> Dispatcher<H>
where
    H: ?Sized + Send + Sync + 'static,
{
    /// Creates an empty dispatcher with [`DispatcherConfig::default`].
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Creates an empty dispatcher with the given configuration.
    pub fn with_config(cfg: DispatcherConfig) -> Self {
        Self {
            table: Arc::new(Table::new()),
            cfg,
        }
    }

    /// Starts a [`DispatcherBuilder`] from the default configuration.
    pub fn builder() -> DispatcherBuilder<H> {
        DispatcherBuilder::new(DispatcherConfig::default())
    }

    /// Dispatcher label used in logs.
    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    /// Configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.cfg
    }

    /// Registers `handler`, holding it weakly.
    ///
    /// Registering an already-registered handler (same `Arc` allocation) is a no-op
    /// with respect to [`handler_count`](Self::handler_count).
    pub fn register(&self, handler: &Arc<H>) {
        let (key, generation) = self.table.insert(Arc::downgrade(handler));
        trace!(dispatcher = %self.cfg.name, ?key, generation, "handler registered");
    }

    /// Registers a handler from a weak handle.
    ///
    /// # Errors
    /// [`DispatchError::InvalidArgument`] if the handle is empty (`Weak::new()`) or
    /// its handler was already reclaimed; the table is left untouched.
    pub fn register_weak(&self, handler: &Weak<H>) -> Result<(), DispatchError> {
        if handler.strong_count() == 0 {
            return Err(DispatchError::empty_handle());
        }
        let (key, generation) = self.table.insert(handler.clone());
        trace!(dispatcher = %self.cfg.name, ?key, generation, "handler registered");
        Ok(())
    }

    /// Removes `handler`; returns `false` if it was not registered.
    pub fn unregister(&self, handler: &Arc<H>) -> bool {
        let key = HandlerKey::of_arc(handler);
        let removed = self.table.remove(key);
        trace!(dispatcher = %self.cfg.name, ?key, removed, "handler unregistered");
        removed
    }

    /// Removes a handler given a weak handle; returns `false` if it was not registered.
    ///
    /// A handle whose handler was already reclaimed still removes its own entry: the
    /// handle keeps the allocation reserved, so its key cannot belong to anyone else.
    ///
    /// # Errors
    /// [`DispatchError::InvalidArgument`] if the handle is dead and has no entry
    /// (`Weak::new()` never has one); the table is left untouched.
    pub fn unregister_weak(&self, handler: &Weak<H>) -> Result<bool, DispatchError> {
        let key = HandlerKey::of_weak(handler);
        let removed = self.table.remove(key);
        if !removed && handler.strong_count() == 0 {
            return Err(DispatchError::empty_handle());
        }
        trace!(dispatcher = %self.cfg.name, ?key, removed, "handler unregistered");
        Ok(removed)
    }

    /// Registers `handler` and returns a guard that unregisters it on drop.
    ///
    /// The guard does not keep the handler alive.
    pub fn subscribe(&self, handler: &Arc<H>) -> Subscription {
        let (key, generation) = self.table.insert(Arc::downgrade(handler));
        trace!(dispatcher = %self.cfg.name, ?key, generation, "handler subscribed");
        let table: Weak<dyn Detach> = Arc::downgrade(&self.table) as Weak<dyn Detach>;
        Subscription::new(table, key, generation)
    }

    /// Number of table entries, live or dead.
    pub fn handler_count(&self) -> usize {
        self.table.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Evicts entries whose handlers were reclaimed; returns how many were evicted.
    ///
    /// Invocation runs this automatically whenever its snapshot saw a dead entry.
    pub fn purge_dead(&self) -> usize {
        let purged = self.table.purge_dead();
        if purged > 0 {
            debug!(dispatcher = %self.cfg.name, purged, "evicted reclaimed handlers");
        }
        purged
    }
}

impl<H> Dispatcher<H>
where
    H: ?Sized + Send + Sync + 'static,
{
    /// Runs one invocation pass; `call` starts a single handler's future.
    pub(crate) async fn dispatch<'a, F>(
        &self,
        ctx: CancellationToken,
        call: F,
    ) -> Result<(), DispatchError>
    where
        H: Describe,
        F: Fn(Arc<H>, CancellationToken) -> HandlerFuture<'a>,
    {
        let Snapshot { live, dead } = self.table.snapshot();
        if dead > 0 {
            self.purge_dead();
        }

        let total = live.len();
        if total == 0 {
            return Ok(());
        }
        debug!(dispatcher = %self.cfg.name, handlers = total, "dispatching event");

        let limiter = self
            .cfg
            .concurrency_limit()
            .map(|n| Semaphore::new(n.min(Semaphore::MAX_PERMITS)));
        let limiter = limiter.as_ref();
        let isolate = self.cfg.isolate_panics;
        let dispatcher = &self.cfg.name;

        let calls = live.into_iter().map(|handler| {
            let name = handler.describe().to_owned();
            let fut = call(handler, ctx.clone());
            async move {
                let _permit = match limiter {
                    Some(sem) => sem.acquire().await.ok(),
                    None => None,
                };
                let outcome = if isolate {
                    match AssertUnwindSafe(fut).catch_unwind().await {
                        Ok(outcome) => outcome,
                        Err(payload) => {
                            let info = panic_message(payload.as_ref());
                            warn!(%dispatcher, handler = %name, %info, "handler panicked");
                            Err(HandlerError::Panicked { info })
                        }
                    }
                } else {
                    fut.await
                };
                outcome.map_err(|error| HandlerFailure {
                    handler: name,
                    error,
                })
            }
        });

        let failures: Vec<HandlerFailure> = join_all(calls)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            warn!(
                dispatcher = %self.cfg.name,
                failed = failures.len(),
                total,
                "handler invocations failed"
            );
            Err(DispatchError::HandlersFailed { total, failures })
        }
    }
}

impl<H> Default for Dispatcher<H>
where
    H: ?Sized + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.cfg.name)
            .field("handlers", &self.table.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::handlers::{Handler, HandlerRef};

    struct Noop;

    #[async_trait]
    impl Handler for Noop {
        async fn handle(&self, _ctx: CancellationToken) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn noop() -> HandlerRef {
        Arc::new(Noop)
    }

    #[test]
    fn test_register_twice_keeps_one_entry() {
        let ev = Dispatcher::<dyn Handler>::new();
        let h = noop();
        ev.register(&h);
        ev.register(&h);
        assert_eq!(ev.handler_count(), 1);

        let alias = Arc::clone(&h);
        ev.register(&alias);
        assert_eq!(ev.handler_count(), 1);
    }

    #[test]
    fn test_distinct_handlers_of_same_type_are_distinct() {
        let ev = Dispatcher::<dyn Handler>::new();
        let a = noop();
        let b = noop();
        ev.register(&a);
        ev.register(&b);
        assert_eq!(ev.handler_count(), 2);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let ev = Dispatcher::<dyn Handler>::new();
        let registered = noop();
        let stranger = noop();
        ev.register(&registered);

        assert!(!ev.unregister(&stranger));
        assert_eq!(ev.handler_count(), 1);
        assert!(ev.unregister(&registered));
        assert!(!ev.unregister(&registered));
        assert!(ev.is_empty());
    }

    #[test]
    fn test_empty_weak_handles_rejected() {
        let ev = Dispatcher::<dyn Handler>::new();
        let h = noop();
        ev.register(&h);

        let empty: Weak<dyn Handler> = Weak::<Noop>::new();
        assert!(matches!(
            ev.register_weak(&empty),
            Err(DispatchError::InvalidArgument { .. })
        ));
        assert!(matches!(
            ev.unregister_weak(&empty),
            Err(DispatchError::InvalidArgument { .. })
        ));
        assert_eq!(ev.handler_count(), 1);
    }

    #[test]
    fn test_weak_register_and_unregister() {
        let ev = Dispatcher::<dyn Handler>::new();
        let h = noop();
        let weak = Arc::downgrade(&h);

        ev.register_weak(&weak).expect("live handle");
        ev.register(&h);
        assert_eq!(ev.handler_count(), 1);
        assert!(ev.unregister_weak(&weak).expect("live handle"));
        assert!(ev.is_empty());
    }

    #[test]
    fn test_unregister_weak_removes_reclaimed_entry() {
        let ev = Dispatcher::<dyn Handler>::new();
        let kept = noop();
        let h = noop();
        let weak = Arc::downgrade(&h);
        ev.register(&kept);
        ev.register(&h);
        drop(h);

        assert!(matches!(
            ev.register_weak(&weak),
            Err(DispatchError::InvalidArgument { .. })
        ));
        assert!(ev.unregister_weak(&weak).expect("entry still present"));
        assert_eq!(ev.handler_count(), 1);
        assert!(matches!(
            ev.unregister_weak(&weak),
            Err(DispatchError::InvalidArgument { .. })
        ));
        assert_eq!(ev.handler_count(), 1);
    }

    #[test]
    fn test_table_does_not_keep_handler_alive() {
        let ev = Dispatcher::<dyn Handler>::new();
        let h = noop();
        let weak = Arc::downgrade(&h);
        ev.register(&h);
        drop(h);

        assert!(weak.upgrade().is_none());
        assert_eq!(ev.handler_count(), 1);
        assert_eq!(ev.purge_dead(), 1);
        assert!(ev.is_empty());
    }

    #[test]
    fn test_concurrent_registration_from_threads() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 64;

        let ev = Dispatcher::<dyn Handler>::new();
        let handlers: Vec<Vec<HandlerRef>> = (0..THREADS)
            .map(|_| (0..PER_THREAD).map(|_| noop()).collect())
            .collect();

        std::thread::scope(|s| {
            for batch in &handlers {
                let ev = &ev;
                s.spawn(move || {
                    for h in batch {
                        ev.register(h);
                        ev.register(h);
                    }
                });
            }
        });

        assert_eq!(ev.handler_count(), THREADS * PER_THREAD);
    }

    #[test]
    fn test_concurrent_register_and_unregister() {
        let ev = Dispatcher::<dyn Handler>::new();
        let keep: Vec<HandlerRef> = (0..128).map(|_| noop()).collect();
        let churn: Vec<HandlerRef> = (0..128).map(|_| noop()).collect();
        let done = AtomicUsize::new(0);

        std::thread::scope(|s| {
            s.spawn(|| {
                for h in &keep {
                    ev.register(h);
                }
                done.fetch_add(1, Ordering::SeqCst);
            });
            s.spawn(|| {
                for h in &churn {
                    ev.register(h);
                    ev.unregister(h);
                }
                done.fetch_add(1, Ordering::SeqCst);
            });
        });

        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert_eq!(ev.handler_count(), keep.len());
    }

    #[test]
    fn test_subscription_unregisters_on_drop() {
        let ev = Dispatcher::<dyn Handler>::new();
        let h = noop();
        {
            let sub = ev.subscribe(&h);
            assert!(sub.is_active());
            assert_eq!(ev.handler_count(), 1);
        }
        assert!(ev.is_empty());
    }

    #[test]
    fn test_stale_subscription_leaves_newer_registration() {
        let ev = Dispatcher::<dyn Handler>::new();
        let h = noop();
        let first = ev.subscribe(&h);
        let second = ev.subscribe(&h);
        assert_eq!(ev.handler_count(), 1);
        assert!(!first.is_active());

        assert!(!first.unsubscribe());
        assert_eq!(ev.handler_count(), 1);
        assert!(second.unsubscribe());
        assert!(ev.is_empty());
    }

    #[test]
    fn test_subscription_outliving_dispatcher_is_inert() {
        let h = noop();
        let sub = {
            let ev = Dispatcher::<dyn Handler>::new();
            ev.subscribe(&h)
        };
        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_builder_applies_config() {
        let ev = Dispatcher::<dyn Handler>::builder()
            .name("saved")
            .max_concurrent(2)
            .isolate_panics(false)
            .build();
        assert_eq!(ev.name(), "saved");
        assert_eq!(ev.config().concurrency_limit(), Some(2));
        assert!(!ev.config().isolate_panics);
    }

    #[test]
    fn test_panic_message_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(s.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
