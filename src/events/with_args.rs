//! # `AsyncEventWithArgs<A>`: notification carrying an event payload.

use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::core::Dispatcher;
use crate::error::DispatchError;
use crate::handlers::ArgsHandler;

/// Dispatcher whose handlers receive `&A` and a [`CancellationToken`].
///
/// The payload is borrowed by every handler for the duration of the pass; no clone is made
/// unless the handler itself clones (as [`HandlerFn`](crate::HandlerFn) does).
pub type AsyncEventWithArgs<A> = Dispatcher<dyn ArgsHandler<A>>;

impl<A> Dispatcher<dyn ArgsHandler<A>>
where
    A: Send + Sync + 'static,
{
    /// Notifies every live handler with `args` and waits for all of them.
    ///
    /// # Errors
    /// [`DispatchError::HandlersFailed`] once every handler finished, if any failed.
    pub async fn invoke(&self, args: &A, ctx: CancellationToken) -> Result<(), DispatchError> {
        self.dispatch(ctx, |handler: Arc<dyn ArgsHandler<A>>, ctx| {
            async move { handler.handle(args, ctx).await }.boxed()
        })
        .await
    }
}
