//! # `AsyncEventWithSender<S, A>`: notification carrying the sender and an event payload.

use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::core::Dispatcher;
use crate::error::DispatchError;
use crate::handlers::SenderHandler;

/// Dispatcher whose handlers receive `&S` (the publisher), `&A` and a [`CancellationToken`].
pub type AsyncEventWithSender<S, A> = Dispatcher<dyn SenderHandler<S, A>>;

impl<S, A> Dispatcher<dyn SenderHandler<S, A>>
where
    S: Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    /// Notifies every live handler with `sender` and `args` and waits for all of them.
    ///
    /// # Errors
    /// [`DispatchError::HandlersFailed`] once every handler finished, if any failed.
    pub async fn invoke(
        &self,
        sender: &S,
        args: &A,
        ctx: CancellationToken,
    ) -> Result<(), DispatchError> {
        self.dispatch(ctx, |handler: Arc<dyn SenderHandler<S, A>>, ctx| {
            async move { handler.handle(sender, args, ctx).await }.boxed()
        })
        .await
    }
}
