//! Change events and in-process fan-out.
//!
//! The inventory store describes every applied command as an [`Event`]; a
//! presentation layer subscribes to an [`EventBus`] to learn when to re-render.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
