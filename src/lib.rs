//! # spark-typewriter
//!
//! Typewriter text animation component for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): the
//! displayed text, color and armed flag are signals a host binds to.
//!
//! ## Architecture
//!
//! The animation is an explicit state machine advanced by a cooperative,
//! single-threaded timer queue:
//! ```text
//! TimerQueue tick → plan(state) → apply(action) → signals / callback → plan ...
//! ```
//! At most one tick is pending per typewriter. The visibility gate and the
//! cursor blinker run beside it and never write text state.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Attr, Rect)
//! - [`state`] - Timer queue, state machine, visibility gate, cursor blink
//! - [`primitives`] - The [`Typewriter`] component and its props
//! - [`config`] - TOML configuration
//! - [`renderer`] - Terminal line renderer
//! - [`pipeline`] - Terminal host (mount, tick, run)

pub mod config;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::TypewriterConfig;
pub use error::{Result, TypewriterError};

pub use primitives::{
    Cleanup, CursorFrame, Frame, PropValue, SentenceCallback, TextSource, Typewriter,
    TypewriterProps,
};

pub use state::{
    CursorBlinker, Phase, SpeedRange, TimerId, TimerQueue, TimerSlot, TypewriterState,
    VisibilityGate,
};

pub use pipeline::{MountHandle, Placement, mount, run, tick};

pub use renderer::{LineRenderer, LineSlot};
