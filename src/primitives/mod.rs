//! Primitives - The typewriter component.
//!
//! - [`Typewriter`] - Animated text reveal with cursor and visibility gate
//!
//! # Architecture
//!
//! A component is mounted from a props struct onto a [`TimerQueue`]:
//! 1. Builds the processed script and the initial state
//! 2. Publishes its outputs as signals
//! 3. Schedules one tick at a time
//! 4. Returns a handle whose teardown (or cleanup) cancels everything
//!
//! [`TimerQueue`]: crate::state::TimerQueue

mod types;
mod typewriter;

pub use types::*;
pub use typewriter::{CursorFrame, Frame, Typewriter};
