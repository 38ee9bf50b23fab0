//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure that produces a fresh future per invocation.
//! The closure shape picks the dispatcher it can be registered with:
//!
//! - `Fn(CancellationToken) -> Fut` - [`Handler`]
//! - `Fn(A, CancellationToken) -> Fut` - [`ArgsHandler<A>`] (`A: Clone`)
//! - `Fn(S, A, CancellationToken) -> Fut` - [`SenderHandler<S, A>`] (`S: Clone, A: Clone`)
//!
//! Arguments are cloned into the closure so the returned future can own them.
//! Shared state goes through `Arc<...>` captured explicitly by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use weakcast::{HandlerError, HandlerFn, HandlerRef};
//!
//! let h: HandlerRef = HandlerFn::arc("audit", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(HandlerError::Canceled);
//!     }
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(h.name(), "audit");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::handler::{ArgsHandler, Handler, SenderHandler};

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when the handler goes straight into a dispatcher.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler behind an `Arc`, ready to coerce into a `*Ref` alias.
    ///
    /// Keep the returned `Arc` alive for as long as the subscription should last:
    /// dispatchers only hold weak references.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, ctx: CancellationToken) -> Result<(), HandlerError> {
        (self.f)(ctx).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<A, F, Fut> ArgsHandler<A> for HandlerFn<F>
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, args: &A, ctx: CancellationToken) -> Result<(), HandlerError> {
        (self.f)(args.clone(), ctx).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<S, A, F, Fut> SenderHandler<S, A> for HandlerFn<F>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(S, A, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(
        &self,
        sender: &S,
        args: &A,
        ctx: CancellationToken,
    ) -> Result<(), HandlerError> {
        (self.f)(sender.clone(), args.clone(), ctx).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
