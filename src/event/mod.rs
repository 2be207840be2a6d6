// Event-driven architecture components
//
// This module provides the infrastructure that carries confirmed match and
// tournament results from the rest of the platform into the leaderboard.

// Public API - what other modules can use
pub use bus::EventBus;
pub use dispatcher::EventDispatcher;
pub use events::{ParticipantResult, PlatformEvent};
pub use handler::{EventError, EventHandler, NoOpEventHandler};

// Internal modules
mod bus;
mod dispatcher;
mod events;
mod handler;
