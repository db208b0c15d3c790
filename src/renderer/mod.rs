//! Terminal renderer for typewriter frames.
//!
//! - [`LineRenderer`] - Draws a [`Frame`](crate::primitives::Frame) on one
//!   terminal row, skipping unchanged frames

mod line;

pub use line::{LineRenderer, LineSlot};
