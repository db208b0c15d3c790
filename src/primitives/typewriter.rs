//! Typewriter Primitive - Animated text reveal.
//!
//! Types the configured sentences one character at a time, optionally deletes
//! them again and cycles, with a blinking cursor and a viewport-gated start.
//!
//! # Reactivity
//!
//! The displayed text, the current color and the armed flag are published as
//! signals, so a host can bind them straight into its own components. All
//! mutation goes through a single timer-driven step on a shared
//! [`TimerQueue`].
//!
//! # Lifecycle
//!
//! - `mount()` creates the state (index 0, empty text) and, if the gate is
//!   open, schedules the first tick
//! - every tick cancels the previous pending timer before scheduling the next
//! - `teardown()` (or dropping the component, or calling its cleanup) cancels
//!   the pending tick and disconnects the visibility gate
//!
//! # Example
//!
//! ```
//! use spark_typewriter::primitives::{Typewriter, TypewriterProps};
//! use spark_typewriter::state::TimerQueue;
//!
//! let queue = TimerQueue::new();
//! let tw = Typewriter::mount(TypewriterProps {
//!     text: "Hi".into(),
//!     typing_speed: 10,
//!     ..Default::default()
//! }, &queue);
//!
//! queue.advance(10);
//! assert_eq!(tw.displayed(), "H");
//! queue.advance(10);
//! assert_eq!(tw.displayed(), "Hi");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rand::SeedableRng;
use rand::rngs::StdRng;
use spark_signals::{Signal, signal};
use tracing::{debug, trace};

use super::types::{Cleanup, PropValue, SentenceCallback, TypewriterProps};
use crate::state::animate::CursorBlinker;
use crate::state::machine::{self, Action, Phase, Script, Step, Timing, TypewriterState};
use crate::state::timer::{TimerQueue, TimerSlot};
use crate::state::visibility::VisibilityGate;
use crate::types::{Attr, Rect, Rgba};

// =============================================================================
// Frame - Render snapshot
// =============================================================================

/// Cursor part of a [`Frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct CursorFrame {
    pub glyph: String,
    /// 0.0 (hidden) to 1.0 (opaque).
    pub opacity: f32,
}

/// Everything a renderer needs to draw a typewriter at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub text: String,
    pub fg: Rgba,
    pub attrs: Attr,
    /// None when the cursor is disabled or hidden while typing.
    pub cursor: Option<CursorFrame>,
}

// =============================================================================
// Internal State
// =============================================================================

struct Inner {
    id: String,
    script: Script,
    timing: Timing,
    state: TypewriterState,
    slot: TimerSlot,
    gate: VisibilityGate,
    blinker: CursorBlinker,
    rng: StdRng,
    torn_down: bool,
}

/// What one action changed, collected under the borrow and published after.
struct Outcome {
    displayed: String,
    sentence_index: usize,
    completed: Option<machine::SentenceComplete>,
}

// =============================================================================
// Typewriter Component
// =============================================================================

/// A mounted typewriter.
///
/// Owns its state; timer callbacks only hold weak references, so nothing can
/// touch a typewriter after it is gone.
pub struct Typewriter {
    inner: Rc<RefCell<Inner>>,
    queue: TimerQueue,
    content: Signal<String>,
    color: Signal<Rgba>,
    armed: Signal<bool>,
    text_colors: Rc<Vec<Rgba>>,
    fg: Option<PropValue<Rgba>>,
    attrs: Option<PropValue<Attr>>,
    show_cursor: bool,
    cursor_character: String,
    hide_cursor_while_typing: bool,
    on_sentence_complete: Option<SentenceCallback>,
}

impl fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Typewriter")
            .field("id", &inner.id)
            .field("state", &inner.state)
            .field("torn_down", &inner.torn_down)
            .finish_non_exhaustive()
    }
}

impl Typewriter {
    /// Mount a typewriter on `queue`.
    ///
    /// The cursor blinker starts now if the cursor is shown. When the gate is
    /// open the first tick is scheduled right away.
    pub fn mount(props: TypewriterProps, queue: &TimerQueue) -> Self {
        let timing = props.timing();
        let script = Script::new(props.text.sentences(), props.reverse_mode);
        let gate = VisibilityGate::new(props.start_on_visible);
        let mut state = TypewriterState::new(gate.is_armed());
        if script.is_empty() {
            state.phase = Phase::Done;
        }

        let mut blinker = CursorBlinker::new(props.cursor_blink_duration);
        if props.show_cursor {
            blinker.start(queue.now());
        }

        let rng = match props.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let id = props.id.clone().unwrap_or_else(|| "typewriter".to_string());
        debug!(
            id = %id,
            sentences = script.len(),
            armed = state.armed,
            "mounting typewriter"
        );

        let text_colors = Rc::new(props.text_colors);
        let base = props.fg.as_ref().map_or(Rgba::TERMINAL_DEFAULT, PropValue::get);
        let color = signal(pick_color(&text_colors, 0).unwrap_or(base));
        let armed = signal(state.armed);

        let inner = Rc::new(RefCell::new(Inner {
            id,
            script,
            timing,
            state,
            slot: TimerSlot::new(queue.clone()),
            gate,
            blinker,
            rng,
            torn_down: false,
        }));

        let typewriter = Self {
            inner,
            queue: queue.clone(),
            content: signal(String::new()),
            color,
            armed,
            text_colors,
            fg: props.fg,
            attrs: props.attrs,
            show_cursor: props.show_cursor,
            cursor_character: props.cursor_character,
            hide_cursor_while_typing: props.hide_cursor_while_typing,
            on_sentence_complete: props.on_sentence_complete,
        };
        typewriter.schedule();
        typewriter
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Signal carrying the displayed text.
    pub fn content(&self) -> Signal<String> {
        self.content.clone()
    }

    /// Signal carrying the color of the current sentence.
    pub fn color(&self) -> Signal<Rgba> {
        self.color.clone()
    }

    /// Signal that flips to true once when the gate opens.
    pub fn armed(&self) -> Signal<bool> {
        self.armed.clone()
    }

    /// Current displayed text.
    pub fn displayed(&self) -> String {
        self.inner.borrow().state.displayed.clone()
    }

    /// Snapshot of the animation state.
    pub fn state(&self) -> TypewriterState {
        self.inner.borrow().state.clone()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.inner.borrow().state.phase
    }

    /// Whether the visibility gate has opened.
    pub fn is_armed(&self) -> bool {
        self.inner.borrow().state.armed
    }

    /// Whether a tick is waiting on the timer queue.
    pub fn has_pending_tick(&self) -> bool {
        self.inner.borrow().slot.is_pending()
    }

    /// Whether the cursor is drawn at all right now.
    ///
    /// With `hide_cursor_while_typing` the cursor disappears while a
    /// character is being typed or deleted.
    pub fn cursor_visible(&self) -> bool {
        if !self.show_cursor {
            return false;
        }
        if !self.hide_cursor_while_typing {
            return true;
        }
        let inner = self.inner.borrow();
        !inner.state.is_animating(&inner.script)
    }

    /// Cursor opacity at `now` (ms on the timer queue clock).
    pub fn cursor_opacity(&self, now: u64) -> f32 {
        if !self.cursor_visible() {
            return 0.0;
        }
        self.inner.borrow().blinker.opacity_at(now)
    }

    /// Render snapshot at the queue's current time.
    pub fn frame(&self) -> Frame {
        let now = self.queue.now();
        let cursor = self.cursor_visible().then(|| CursorFrame {
            glyph: self.cursor_character.clone(),
            opacity: self.cursor_opacity(now),
        });
        Frame {
            text: self.displayed(),
            fg: self.current_color(),
            attrs: self.attrs.as_ref().map_or(Attr::NONE, PropValue::get),
            cursor,
        }
    }

    fn current_color(&self) -> Rgba {
        let index = self.inner.borrow().state.sentence_index;
        pick_color(&self.text_colors, index)
            .unwrap_or_else(|| self.fg.as_ref().map_or(Rgba::TERMINAL_DEFAULT, PropValue::get))
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Report the element and viewport geometry to the visibility gate.
    ///
    /// Returns true when this observation armed the typewriter.
    pub fn observe_visibility(&self, element: &Rect, viewport: &Rect) -> bool {
        let armed_now = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return false;
            }
            let armed_now = inner.gate.observe(element, viewport);
            if armed_now {
                inner.state.armed = true;
                debug!(id = %inner.id, "typewriter armed by visibility");
            }
            armed_now
        };
        if armed_now {
            self.armed.set(true);
            self.schedule();
        }
        armed_now
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Cancel the pending tick and disconnect the visibility gate.
    ///
    /// Idempotent. The typewriter keeps its last displayed text.
    pub fn teardown(&self) {
        teardown_inner(&self.inner);
    }

    /// Cleanup closure for hosts that manage components as cleanups.
    pub fn cleanup(&self) -> Cleanup {
        let weak = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                teardown_inner(&inner);
            }
        })
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    fn schedule(&self) {
        drive(&self.driver());
    }

    fn driver(&self) -> Driver {
        Driver {
            inner: Rc::downgrade(&self.inner),
            content: self.content.clone(),
            color: self.color.clone(),
            text_colors: self.text_colors.clone(),
            on_sentence_complete: self.on_sentence_complete.clone(),
        }
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        teardown_inner(&self.inner);
    }
}

fn teardown_inner(inner: &Rc<RefCell<Inner>>) {
    let mut inner = inner.borrow_mut();
    if inner.torn_down {
        return;
    }
    inner.torn_down = true;
    inner.slot.cancel();
    inner.gate.disconnect();
    inner.blinker.stop();
    debug!(id = %inner.id, displayed = %inner.state.displayed, "typewriter torn down");
}

fn pick_color(colors: &[Rgba], sentence_index: usize) -> Option<Rgba> {
    if colors.is_empty() {
        None
    } else {
        Some(colors[sentence_index % colors.len()])
    }
}

// =============================================================================
// Driver - What a timer callback carries
// =============================================================================

/// Weak handle plus output channels, cloned into every timer callback.
#[derive(Clone)]
struct Driver {
    inner: Weak<RefCell<Inner>>,
    content: Signal<String>,
    color: Signal<Rgba>,
    text_colors: Rc<Vec<Rgba>>,
    on_sentence_complete: Option<SentenceCallback>,
}

/// Plan the next step and either apply it now or put it on the timer slot.
fn drive(driver: &Driver) {
    loop {
        let Some(inner) = driver.inner.upgrade() else {
            return;
        };

        let step = {
            let mut guard = inner.borrow_mut();
            if guard.torn_down {
                return;
            }
            let Inner { script, timing, state, rng, .. } = &mut *guard;
            machine::plan(script, timing, state, rng)
        };

        match step {
            Step::Wait => return,
            Step::Now(action) => run(driver, &inner, action),
            Step::After { delay_ms, action } => {
                let next = driver.clone();
                let mut guard = inner.borrow_mut();
                trace!(id = %guard.id, ?action, delay_ms, "scheduling tick");
                guard.slot.set(delay_ms, move || {
                    if let Some(inner) = next.inner.upgrade() {
                        run(&next, &inner, action);
                        drive(&next);
                    }
                });
                return;
            }
        }
    }
}

/// Apply one action, then publish outputs and fire the callback with no
/// borrow held.
fn run(driver: &Driver, inner: &Rc<RefCell<Inner>>, action: Action) {
    let outcome = {
        let mut guard = inner.borrow_mut();
        if guard.torn_down {
            return;
        }
        let Inner { script, timing, state, id, .. } = &mut *guard;
        let completed = machine::apply(script, timing, state, action);
        trace!(
            id = %id,
            ?action,
            char_index = state.char_index,
            sentence_index = state.sentence_index,
            "tick"
        );
        if let Some(done) = &completed {
            debug!(id = %id, index = done.index, sentence = %done.sentence, "sentence complete");
        }
        Outcome {
            displayed: state.displayed.clone(),
            sentence_index: state.sentence_index,
            completed,
        }
    };

    driver.content.set(outcome.displayed);
    if let Some(color) = pick_color(&driver.text_colors, outcome.sentence_index) {
        driver.color.set(color);
    }
    if let (Some(done), Some(callback)) = (outcome.completed, &driver.on_sentence_complete) {
        callback(&done.sentence, done.index);
    }
}

// =============================================================================
// Tests
// =============================================================================
