//! # Handler abstractions.
//!
//! This module provides the handler-related types:
//! - [`Handler`], [`ArgsHandler`], [`SenderHandler`] - async cancelable callbacks, one per arity
//! - [`HandlerFn`] - closure-backed implementation of all three
//! - [`HandlerRef`], [`ArgsHandlerRef`], [`SenderHandlerRef`] - shared `Arc<dyn ...>` handles

mod handler;
mod handler_fn;

pub(crate) use handler::Describe;
pub use handler::{ArgsHandler, ArgsHandlerRef, Handler, HandlerRef, SenderHandler, SenderHandlerRef};
pub use handler_fn::HandlerFn;
