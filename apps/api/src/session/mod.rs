// Per-visitor analysis sessions: the state machine and the in-memory registry.

pub mod controller;
pub mod handlers;
pub mod registry;

pub use controller::TransitionError;
pub use registry::SessionRegistry;
