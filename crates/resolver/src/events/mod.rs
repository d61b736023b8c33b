//! Resolver lifecycle events.
//!
//! Provides the closed set of event types and the sink trait the resolver
//! emits them through. Delivery is synchronous and best-effort: a sink must
//! never block the resolution that produced the event.

mod bus;
mod resolver_event;
mod sink;

pub use bus::EventBus;
pub use resolver_event::*;
pub use sink::*;
