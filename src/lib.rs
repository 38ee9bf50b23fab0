//! # weakcast
//!
//! **weakcast** is an asynchronous multi-subscriber event dispatcher for Rust.
//!
//! A publisher owns a dispatcher per event; subscribers register a handler and may be
//! dropped at any time without unregistering. The dispatcher only holds handlers
//! weakly, fans every notification out to all live handlers at once, waits for all of
//! them, and evicts entries of reclaimed handlers along the way.
//!
//! ## Architecture
//! ```text
//!   subscriber A        subscriber B        subscriber C
//!   Arc<HandlerA>       Arc<HandlerB>       Arc<HandlerC> ──► dropped
//!        │ register          │ register          │ register
//!        ▼                   ▼                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher<H>                                                    │
//! │  - Table: DashMap<HandlerKey, Weak<H>>   (identity = Arc address) │
//! │  - DispatcherConfig (name, max_concurrent, isolate_panics)        │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ invoke(args.., ctx)
//!        ├─► snapshot: A live, B live, C dead
//!        ├─► purge dead entries (C)
//!        ├─► A.handle(args.., ctx) ┐
//!        ├─► B.handle(args.., ctx) ┴─► join_all ──► Ok(()) | Err(HandlersFailed)
//! ```
//!
//! ## Features
//! | Area               | Description                                                     | Key types / traits                          |
//! |--------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Dispatchers**    | One engine, three arities.                                      | [`AsyncEvent`], [`AsyncEventWithArgs`], [`AsyncEventWithSender`] |
//! | **Handlers**       | Async cancelable callbacks, trait or closure based.             | [`Handler`], [`ArgsHandler`], [`SenderHandler`], [`HandlerFn`] |
//! | **Lifetimes**      | Weak registration plus optional RAII unregistration.            | [`Dispatcher::register`], [`Subscription`]  |
//! | **Errors**         | Typed errors with aggregate reporting.                          | [`DispatchError`], [`HandlerError`]         |
//! | **Configuration**  | Per-dispatcher settings, passed explicitly.                     | [`DispatcherConfig`], [`DispatcherBuilder`] |
//!
//! ## Logging
//! Records are emitted through [`tracing`] with a `dispatcher` field; install any
//! subscriber to see them.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use weakcast::{ArgsHandlerRef, AsyncEventWithArgs, HandlerError, HandlerFn};
//!
//! #[derive(Clone)]
//! struct Saved { path: String }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let saved = AsyncEventWithArgs::<Saved>::builder().name("saved").build();
//!
//!     // The subscriber keeps its handler alive; the dispatcher does not.
//!     let indexer: ArgsHandlerRef<Saved> = HandlerFn::arc("indexer", |ev: Saved, ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(HandlerError::Canceled);
//!         }
//!         println!("indexing {}", ev.path);
//!         Ok(())
//!     });
//!     saved.register(&indexer);
//!
//!     saved.invoke(&Saved { path: "notes.md".into() }, CancellationToken::new()).await?;
//!
//!     drop(indexer);
//!     saved.invoke(&Saved { path: "todo.md".into() }, CancellationToken::new()).await?;
//!     assert_eq!(saved.handler_count(), 0);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use crate::core::{Dispatcher, DispatcherBuilder, DispatcherConfig, Subscription};
pub use error::{DispatchError, HandlerError, HandlerFailure};
pub use events::{AsyncEvent, AsyncEventWithArgs, AsyncEventWithSender};
pub use handlers::{
    ArgsHandler, ArgsHandlerRef, Handler, HandlerFn, HandlerRef, SenderHandler, SenderHandlerRef,
};
