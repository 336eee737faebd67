//! Dialog state machine
//!
//! Pure transitions over named dialog states. The runtime executes the
//! returned effects; nothing in here performs I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Command, Event};
pub use state::{DialogState, UserId};
pub use transition::transition;
