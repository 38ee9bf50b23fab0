//! # Event arities.
//!
//! Each arity is a [`Dispatcher`](crate::Dispatcher) over its handler trait object,
//! adding only an `invoke` adapter that forwards the arity's arguments:
//!
//! ```text
//! AsyncEvent                   = Dispatcher<dyn Handler>             invoke(ctx)
//! AsyncEventWithArgs<A>        = Dispatcher<dyn ArgsHandler<A>>      invoke(&args, ctx)
//! AsyncEventWithSender<S, A>   = Dispatcher<dyn SenderHandler<S, A>> invoke(&sender, &args, ctx)
//! ```

mod simple;
mod with_args;
mod with_sender;

pub use simple::AsyncEvent;
pub use with_args::AsyncEventWithArgs;
pub use with_sender::AsyncEventWithSender;
