//! # `AsyncEvent`: notification without arguments.

use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::core::Dispatcher;
use crate::error::DispatchError;
use crate::handlers::Handler;

/// Dispatcher whose handlers receive only a [`CancellationToken`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tokio_util::sync::CancellationToken;
/// use weakcast::{AsyncEvent, HandlerError, HandlerFn, HandlerRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), weakcast::DispatchError> {
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let h: HandlerRef = HandlerFn::arc("count", move |_ctx: CancellationToken| {
///     let counter = Arc::clone(&counter);
///     async move {
///         counter.fetch_add(1, Ordering::SeqCst);
///         Ok::<_, HandlerError>(())
///     }
/// });
///
/// let ev = AsyncEvent::new();
/// ev.register(&h);
/// ev.invoke(CancellationToken::new()).await?;
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// # Ok(())
/// # }
/// ```
pub type AsyncEvent = Dispatcher<dyn Handler>;

impl Dispatcher<dyn Handler> {
    /// Notifies every live handler and waits for all of them.
    ///
    /// # Errors
    /// [`DispatchError::HandlersFailed`] once every handler finished, if any failed.
    pub async fn invoke(&self, ctx: CancellationToken) -> Result<(), DispatchError> {
        self.dispatch(ctx, |handler: Arc<dyn Handler>, ctx| {
            async move { handler.handle(ctx).await }.boxed()
        })
        .await
    }
}
