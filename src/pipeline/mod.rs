//! Pipeline - Terminal host for a typewriter.
//!
//! - [`mount`] / [`unmount`](MountHandle::unmount) - lifecycle
//! - [`tick`] / [`run`] - event loop driving the timer queue with the wall clock

mod mount;
mod terminal;

pub use mount::{MountHandle, Placement, mount, run, tick};
pub use terminal::{TerminalSetup, detect_terminal_size};
