//! Mount API - Hosting a typewriter in the terminal.
//!
//! This module is the host renderer: it creates a typewriter on a timer
//! queue, advances the queue with the wall clock, feeds the visibility gate
//! with the element's on-screen position and draws every frame.
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::pipeline::{mount, run, Placement};
//!
//! let mut handle = mount(props, Placement::default())?;
//!
//! // Option 1: Run blocking event loop
//! run(&mut handle)?;
//!
//! // Option 2: Tick manually in your own loop
//! while tick(&mut handle)? {
//!     // Your logic here
//! }
//!
//! handle.unmount()?;
//! ```
//!
//! # Keys
//!
//! - `q`, `Esc`, `Ctrl+C` - stop
//! - `Up` / `Down` - scroll the view by one row (moves the element, which is
//!   how a `start_on_visible` typewriter gets scrolled into view)

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use super::terminal::{TerminalSetup, detect_terminal_size};
use crate::error::Result;
use crate::primitives::{Typewriter, TypewriterProps};
use crate::renderer::{LineRenderer, LineSlot};
use crate::state::timer::TimerQueue;
use crate::types::Rect;

/// Upper bound on one poll wait while the cursor blinks (~60fps).
const FRAME_MS: u64 = 16;

/// Upper bound on one poll wait when nothing animates.
const IDLE_MS: u64 = 250;

// =============================================================================
// Placement
// =============================================================================

/// Where the typewriter sits in the scrollable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub column: u16,
    /// Document row; the view shows rows `scroll..scroll + height`.
    pub row: i32,
}

impl Placement {
    /// Element rect relative to the viewport for a scroll offset.
    pub fn element_rect(&self, scroll: i32, terminal_width: u16) -> Rect {
        Rect::new(
            self.column as i32,
            self.row.saturating_sub(scroll),
            terminal_width.saturating_sub(self.column).max(1),
            1,
        )
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`].
///
/// Holds the typewriter, its timer queue, the renderer and the terminal
/// state. Dropping it tears the typewriter down and restores the terminal.
pub struct MountHandle {
    queue: TimerQueue,
    typewriter: Typewriter,
    renderer: LineRenderer<std::io::Stdout>,
    terminal: TerminalSetup,
    running: Arc<AtomicBool>,
    started: Instant,
    placement: Placement,
    scroll: i32,
    size: (u16, u16),
}

impl MountHandle {
    /// The hosted typewriter.
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the loop (sets running to false).
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Flag shared with signal handlers or other threads that want to stop
    /// the loop.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Tear the typewriter down and restore the terminal.
    pub fn unmount(mut self) -> Result<()> {
        self.stop();
        self.typewriter.teardown();
        self.terminal.restore()?;
        info!("typewriter unmounted");
        Ok(())
    }

    fn viewport(&self) -> Rect {
        Rect::new(0, 0, self.size.0, self.size.1)
    }

    /// Screen line of the element, if it is inside the viewport.
    fn line_slot(&self) -> Option<LineSlot> {
        let element = self.placement.element_rect(self.scroll, self.size.0);
        let viewport = self.viewport();
        viewport.contains(element.x, element.y).then(|| LineSlot {
            column: element.x as u16,
            row: element.y as u16,
            width: element.width,
        })
    }

    fn poll_timeout(&self) -> Duration {
        let now = self.queue.now();
        let until_tick = self
            .queue
            .next_deadline()
            .map_or(IDLE_MS, |deadline| deadline.saturating_sub(now));
        let cap = if self.typewriter.cursor_visible() { FRAME_MS } else { IDLE_MS };
        Duration::from_millis(until_tick.min(cap))
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.typewriter.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount a typewriter in fullscreen mode.
///
/// Enters the alternate screen, creates the typewriter and draws the first
/// frame.
pub fn mount(props: TypewriterProps, placement: Placement) -> Result<MountHandle> {
    let terminal = TerminalSetup::enter_fullscreen()?;
    let queue = TimerQueue::new();
    let typewriter = Typewriter::mount(props, &queue);
    let size = detect_terminal_size();

    info!(?placement, width = size.0, height = size.1, "typewriter mounted");

    let mut handle = MountHandle {
        queue,
        typewriter,
        renderer: LineRenderer::stdout(),
        terminal,
        running: Arc::new(AtomicBool::new(true)),
        started: Instant::now(),
        placement,
        scroll: 0,
        size,
    };
    observe_and_render(&mut handle)?;
    Ok(handle)
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the loop once.
///
/// Waits for input or the next due timer, advances the timer queue to the
/// wall clock, updates visibility and renders.
///
/// # Returns
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (quit key pressed or `handle.stop()` called)
/// * `Err(e)` - I/O error while polling or rendering
pub fn tick(handle: &mut MountHandle) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if event::poll(handle.poll_timeout())? {
        handle_event(handle, event::read()?);
    }

    let elapsed = handle.started.elapsed().as_millis() as u64;
    handle.queue.advance_to(elapsed);

    observe_and_render(handle)?;
    Ok(handle.is_running())
}

/// Run the event loop (blocking until stopped).
pub fn run(handle: &mut MountHandle) -> Result<()> {
    while tick(handle)? {}
    Ok(())
}

fn handle_event(handle: &mut MountHandle, event: Event) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => handle.stop(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => handle.stop(),
            KeyCode::Up => handle.scroll = handle.scroll.saturating_sub(1),
            KeyCode::Down => handle.scroll = handle.scroll.saturating_add(1),
            _ => {}
        },
        Event::Resize(width, height) => {
            debug!(width, height, "terminal resized");
            handle.size = (width, height);
            handle.renderer.invalidate();
        }
        _ => {}
    }
}

fn observe_and_render(handle: &mut MountHandle) -> Result<()> {
    let element = handle.placement.element_rect(handle.scroll, handle.size.0);
    let viewport = handle.viewport();
    handle.typewriter.observe_visibility(&element, &viewport);

    let slot = handle.line_slot();
    let frame = handle.typewriter.frame();
    handle.renderer.render(&frame, slot)?;
    Ok(())
}
