//! # Handler traits, one per dispatcher arity.
//!
//! A handler is an async, cancelable callback. Each trait has a stable
//! [`name`](Handler::name) used in logs and failure reports, and an async
//! `handle` method that receives the arity's arguments plus a [`CancellationToken`].
//!
//! | Trait                    | Dispatcher                                      | Arguments             |
//! |--------------------------|-------------------------------------------------|-----------------------|
//! | [`Handler`]              | [`AsyncEvent`](crate::AsyncEvent)               | none                  |
//! | [`ArgsHandler<A>`]       | [`AsyncEventWithArgs`](crate::AsyncEventWithArgs) | `&A`                |
//! | [`SenderHandler<S, A>`]  | [`AsyncEventWithSender`](crate::AsyncEventWithSender) | `&S`, `&A`      |
//!
//! Handlers should check the token and return [`HandlerError::Canceled`] (or `Ok`)
//! promptly once it fires; the dispatcher never aborts a running handler.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

/// Shared handle to a no-argument handler.
pub type HandlerRef = Arc<dyn Handler>;

/// Shared handle to a handler receiving an event payload.
pub type ArgsHandlerRef<A> = Arc<dyn ArgsHandler<A>>;

/// Shared handle to a handler receiving a sender and an event payload.
pub type SenderHandlerRef<S, A> = Arc<dyn SenderHandler<S, A>>;

/// # Handler without event arguments.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use weakcast::{Handler, HandlerError};
///
/// struct Flush;
///
/// #[async_trait]
/// impl Handler for Flush {
///     async fn handle(&self, ctx: CancellationToken) -> Result<(), HandlerError> {
///         if ctx.is_cancelled() {
///             return Err(HandlerError::Canceled);
///         }
///         // flush buffers...
///         Ok(())
///     }
///
///     fn name(&self) -> &str { "flush" }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Reacts to one event notification.
    async fn handle(&self, ctx: CancellationToken) -> Result<(), HandlerError>;

    /// Returns the handler name used in logs and [`HandlerFailure`](crate::HandlerFailure).
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// # Handler receiving an event payload.
#[async_trait]
pub trait ArgsHandler<A: Sync>: Send + Sync + 'static {
    /// Reacts to one event notification carrying `args`.
    async fn handle(&self, args: &A, ctx: CancellationToken) -> Result<(), HandlerError>;

    /// Returns the handler name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// # Handler receiving the publishing sender and an event payload.
#[async_trait]
pub trait SenderHandler<S: Sync, A: Sync>: Send + Sync + 'static {
    /// Reacts to one event notification raised by `sender` with `args`.
    async fn handle(&self, sender: &S, args: &A, ctx: CancellationToken)
        -> Result<(), HandlerError>;

    /// Returns the handler name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Name lookup shared by every handler trait object, used by the dispatch engine.
pub(crate) trait Describe {
    fn describe(&self) -> &str;
}

impl Describe for dyn Handler {
    fn describe(&self) -> &str {
        self.name()
    }
}

impl<A: Sync + 'static> Describe for dyn ArgsHandler<A> {
    fn describe(&self) -> &str {
        self.name()
    }
}

impl<S: Sync + 'static, A: Sync + 'static> Describe for dyn SenderHandler<S, A> {
    fn describe(&self) -> &str {
        self.name()
    }
}
