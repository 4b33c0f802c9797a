//! Host layer: the typed surface this crate consumes from its host.
//!
//! # Modules
//!
//! - [`traits`]: [`EventTarget`], [`HostFactory`] and the [`HostCallback`]
//!   closures handed across.
//! - [`memory`]: in-memory implementations for native use and tests.

pub mod memory;
pub mod traits;

pub use memory::{MemoryEventTarget, MemoryFactory};
pub use traits::{CallbackId, EventTarget, HostCallback, HostFactory, Invocation};
