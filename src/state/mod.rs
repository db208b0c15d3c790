//! State Module - Runtime state systems behind the typewriter
//!
//! - **Timer** - Virtual-time timer queue and single-timer slots
//! - **Machine** - Pure typing/deleting state machine
//! - **Visibility** - One-shot viewport latch
//! - **Animate** - Cursor blink opacity oscillator

pub mod animate;
pub mod machine;
pub mod timer;
pub mod visibility;

pub use animate::{CursorBlinker, ease_in_out};
pub use machine::{
    Action, Phase, Script, SentenceComplete, SpeedRange, Step, Timing, TypewriterState,
};
pub use timer::{TimerId, TimerQueue, TimerSlot};
pub use visibility::{VISIBILITY_THRESHOLD, VisibilityGate, intersection_ratio};
