//! Typing State Machine - Pure planning and transitions
//!
//! The typewriter is an explicit state machine. Nothing in this module owns a
//! timer: [`plan`] looks at the current [`TypewriterState`] and answers "what
//! happens next, and after how long", and [`apply`] performs one [`Action`].
//! The component in `primitives::typewriter` runs `plan → schedule → apply` on
//! a timer queue.
//!
//! # Phases
//!
//! ```text
//! Idle → Typing → PauseAfterType → Deleting → PauseAfterDelete → Typing ...
//!          │                          │
//!          └─ single sentence ─→ Done └─ last sentence, no loop ─→ Done
//! ```
//!
//! # Invariants
//!
//! - `displayed` is always a prefix of the processed current sentence
//! - `char_index <= processed length`
//! - `sentence_index < sentence count` (or 0 when there are no sentences)

use rand::Rng;

// =============================================================================
// SCRIPT - Processed sentences
// =============================================================================

/// The sentences of a typewriter plus their processed character sequences.
///
/// In reverse mode each sentence's characters are reversed once up front;
/// typing still appends left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    sentences: Vec<String>,
    processed: Vec<Vec<char>>,
}

impl Script {
    /// Build a script, reversing each sentence when `reverse` is set.
    pub fn new(sentences: Vec<String>, reverse: bool) -> Self {
        let processed = sentences
            .iter()
            .map(|s| {
                if reverse {
                    s.chars().rev().collect()
                } else {
                    s.chars().collect()
                }
            })
            .collect();
        Self { sentences, processed }
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// True when there is nothing to type at all.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Unprocessed sentence text (empty string if out of range).
    pub fn sentence(&self, index: usize) -> &str {
        self.sentences.get(index).map(String::as_str).unwrap_or("")
    }

    /// Processed characters of a sentence (empty if out of range).
    pub fn chars(&self, index: usize) -> &[char] {
        self.processed.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length in characters of the processed sentence.
    pub fn char_len(&self, index: usize) -> usize {
        self.chars(index).len()
    }
}

// =============================================================================
// TIMING
// =============================================================================

/// Inclusive range for per-character random typing delays (ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct SpeedRange {
    pub min: u64,
    pub max: u64,
}

impl SpeedRange {
    /// Create a range, swapping the bounds if they are inverted.
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }.normalized()
    }

    /// Same range with `min <= max`.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self { min: self.max, max: self.min }
        } else {
            self
        }
    }
}

/// Delays driving the state machine, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub typing_speed: u64,
    pub deleting_speed: u64,
    pub initial_delay: u64,
    pub pause_duration: u64,
    pub variable_speed: Option<SpeedRange>,
    pub loop_text: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            typing_speed: 50,
            deleting_speed: 30,
            initial_delay: 0,
            pause_duration: 1000,
            variable_speed: None,
            loop_text: false,
        }
    }
}

impl Timing {
    /// Delay before the next revealed character.
    ///
    /// With a variable speed range every call draws a fresh uniform value.
    pub fn char_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self.variable_speed {
            Some(range) => {
                let range = range.normalized();
                rng.gen_range(range.min..=range.max)
            }
            None => self.typing_speed,
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not started (not armed yet, or waiting out the initial delay).
    #[default]
    Idle,
    /// Revealing characters.
    Typing,
    /// Full sentence shown, waiting to delete.
    PauseAfterType,
    /// Removing characters.
    Deleting,
    /// Sentence erased, waiting to type the next one.
    PauseAfterDelete,
    /// Finished. Nothing is ever scheduled again.
    Done,
}

/// Mutable animation state of one typewriter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypewriterState {
    /// Text currently shown.
    pub displayed: String,
    /// Index of the next character to reveal.
    pub char_index: usize,
    /// True while erasing.
    pub deleting: bool,
    /// Sentence being typed or deleted.
    pub sentence_index: usize,
    /// Visibility gate has opened.
    pub armed: bool,
    pub phase: Phase,
}

impl TypewriterState {
    /// Fresh state at mount.
    pub fn new(armed: bool) -> Self {
        Self { armed, ..Default::default() }
    }

    /// At the start of a sentence: nothing shown, nothing typed, not deleting.
    pub fn at_sentence_start(&self) -> bool {
        self.displayed.is_empty() && self.char_index == 0 && !self.deleting
    }

    /// A character is being typed or deleted right now.
    pub fn is_animating(&self, script: &Script) -> bool {
        self.phase != Phase::Done
            && (self.char_index < script.char_len(self.sentence_index) || self.deleting)
    }
}

// =============================================================================
// STEPS AND ACTIONS
// =============================================================================

/// One transition of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append the next processed character.
    Reveal,
    /// Remove the last displayed character.
    Erase,
    /// Sentence fully typed.
    FinishTyping,
    /// Pause after typing is over; begin erasing.
    StartDeleting,
    /// Display erased to empty.
    FinishDeleting,
    /// Pause after deleting is over; type the (new) current sentence.
    Resume,
}

/// What the scheduler should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to schedule (not armed, or done).
    Wait,
    /// Apply this action right away.
    Now(Action),
    /// Apply this action after `delay_ms`.
    After { delay_ms: u64, action: Action },
}

/// A sentence finished its cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceComplete {
    pub sentence: String,
    pub index: usize,
}

/// Decide the next step for `state`.
///
/// Only draws from `rng` when the next step reveals a character.
pub fn plan<R: Rng + ?Sized>(
    script: &Script,
    timing: &Timing,
    state: &TypewriterState,
    rng: &mut R,
) -> Step {
    if !state.armed || script.is_empty() {
        return Step::Wait;
    }

    match state.phase {
        Phase::Done => Step::Wait,
        Phase::PauseAfterType => Step::After {
            delay_ms: timing.pause_duration,
            action: Action::StartDeleting,
        },
        Phase::PauseAfterDelete => Step::After {
            delay_ms: timing.pause_duration,
            action: Action::Resume,
        },
        Phase::Idle | Phase::Typing => {
            if state.char_index < script.char_len(state.sentence_index) {
                let mut delay_ms = timing.char_delay(rng);
                if state.at_sentence_start() {
                    delay_ms = delay_ms.saturating_add(timing.initial_delay);
                }
                Step::After { delay_ms, action: Action::Reveal }
            } else {
                Step::Now(Action::FinishTyping)
            }
        }
        Phase::Deleting => {
            if state.displayed.is_empty() {
                Step::Now(Action::FinishDeleting)
            } else {
                Step::After {
                    delay_ms: timing.deleting_speed,
                    action: Action::Erase,
                }
            }
        }
    }
}

/// Apply `action` to `state`, reporting a sentence completion if one happened.
pub fn apply(
    script: &Script,
    timing: &Timing,
    state: &mut TypewriterState,
    action: Action,
) -> Option<SentenceComplete> {
    let index = state.sentence_index;
    match action {
        Action::Reveal => {
            if let Some(&c) = script.chars(index).get(state.char_index) {
                state.displayed.push(c);
                state.char_index += 1;
            }
            state.phase = Phase::Typing;
            None
        }
        Action::FinishTyping => {
            if script.len() > 1 {
                state.phase = Phase::PauseAfterType;
                None
            } else {
                state.phase = Phase::Done;
                completion(script, index)
            }
        }
        Action::StartDeleting => {
            state.deleting = true;
            state.phase = Phase::Deleting;
            None
        }
        Action::Erase => {
            state.displayed.pop();
            state.phase = Phase::Deleting;
            None
        }
        Action::FinishDeleting => {
            state.deleting = false;
            if index + 1 >= script.len() && !timing.loop_text {
                state.phase = Phase::Done;
                return None;
            }
            let done = completion(script, index);
            state.sentence_index = (index + 1) % script.len().max(1);
            state.char_index = 0;
            state.phase = Phase::PauseAfterDelete;
            done
        }
        Action::Resume => {
            state.phase = Phase::Typing;
            None
        }
    }
}

fn completion(script: &Script, index: usize) -> Option<SentenceComplete> {
    if script.is_empty() {
        return None;
    }
    Some(SentenceComplete {
        sentence: script.sentence(index).to_string(),
        index,
    })
}

// =============================================================================
// TESTS
// =============================================================================
