//! Input handling with gamepad support
//!
//! Keyboard and gamepad are polled once per frame and folded into a
//! `Controls` snapshot. The simulation only ever sees that snapshot.
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: keyboard only

mod actions;
mod gamepad;
mod state;

pub use actions::*;
pub use gamepad::Gamepad;
pub use state::*;
