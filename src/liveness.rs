//! Liveness keeper
//!
//! A periodic self-ping and a constant health responder that keep an idle
//! hosted process from being suspended. Neither touches dialog state.

mod health;
mod ping;

pub use health::serve_health;
pub use ping::{HttpPingTarget, SelfPinger};
