//! Dispatch core: registration table and the shared invocation engine.
//!
//! The public API from this module is [`Dispatcher`], its [`DispatcherConfig`]
//! and [`DispatcherBuilder`], and the [`Subscription`] guard.
//!
//! Internal modules:
//! - [`table`]: concurrent key → weak-handler map with dead-entry eviction;
//! - [`dispatcher`]: registration operations and the fan-out/fan-in pass;
//! - [`subscription`]: RAII unregistration;
//! - [`config`] / [`builder`]: per-dispatcher settings.

mod builder;
mod config;
mod dispatcher;
mod subscription;
mod table;

pub use builder::DispatcherBuilder;
pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use subscription::Subscription;
