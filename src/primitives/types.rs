//! Primitive types - Props, callbacks and cleanup.
//!
//! These types define the interface for the typewriter component.
//! Styling props support static values, signals, and getters for reactivity.

use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;

use crate::state::machine::{SpeedRange, Timing};
use crate::types::{Attr, Rgba};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Sentence completion callback: `(sentence, index)`.
///
/// Rc so the callback can be cloned into timer closures.
pub type SentenceCallback = Rc<dyn Fn(&str, usize)>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

// =============================================================================
// Text Source
// =============================================================================

/// What a typewriter types: one string or an ordered list of sentences.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum TextSource {
    Single(String),
    Many(Vec<String>),
}

impl TextSource {
    /// The sentences in typing order.
    pub fn sentences(&self) -> Vec<String> {
        match self {
            TextSource::Single(s) => vec![s.clone()],
            TextSource::Many(list) => list.clone(),
        }
    }
}

impl Default for TextSource {
    fn default() -> Self {
        TextSource::Single(String::new())
    }
}

impl From<&str> for TextSource {
    fn from(value: &str) -> Self {
        TextSource::Single(value.to_string())
    }
}

impl From<String> for TextSource {
    fn from(value: String) -> Self {
        TextSource::Single(value)
    }
}

impl From<Vec<String>> for TextSource {
    fn from(value: Vec<String>) -> Self {
        TextSource::Many(value)
    }
}

impl From<Vec<&str>> for TextSource {
    fn from(value: Vec<&str>) -> Self {
        TextSource::Many(value.into_iter().map(String::from).collect())
    }
}

// =============================================================================
// Typewriter Props
// =============================================================================

/// Properties for the Typewriter component.
///
/// # Example
///
/// ```ignore
/// use spark_typewriter::primitives::{Typewriter, TypewriterProps};
/// use spark_typewriter::state::TimerQueue;
///
/// let queue = TimerQueue::new();
/// let tw = Typewriter::mount(TypewriterProps {
///     text: vec!["Hello", "World"].into(),
///     loop_text: true,
///     ..Default::default()
/// }, &queue);
///
/// queue.advance(1_000);
/// println!("{}", tw.displayed());
/// ```
pub struct TypewriterProps {
    /// Optional component ID (used in log events).
    pub id: Option<String>,

    // =========================================================================
    // Content
    // =========================================================================

    /// Sentence or sentences to type (required).
    pub text: TextSource,

    /// Reveal each sentence's characters in reverse order.
    pub reverse_mode: bool,

    /// Keep cycling past the last sentence.
    pub loop_text: bool,

    // =========================================================================
    // Timing (ms)
    // =========================================================================

    /// Delay per revealed character (default: 50).
    pub typing_speed: u64,

    /// Delay per removed character (default: 30).
    pub deleting_speed: u64,

    /// Delay before the first character of a sentence start (default: 0).
    pub initial_delay: u64,

    /// Pause after typing and after deleting (default: 1000).
    pub pause_duration: u64,

    /// Random per-character typing delay; overrides `typing_speed`.
    pub variable_speed: Option<SpeedRange>,

    /// Seed for the variable-speed generator (entropy when None).
    pub seed: Option<u64>,

    // =========================================================================
    // Visual
    // =========================================================================

    /// Colors applied cyclically by sentence index.
    pub text_colors: Vec<Rgba>,

    /// Text color when `text_colors` is empty.
    pub fg: Option<PropValue<Rgba>>,

    /// Text attributes (bold, italic, ...).
    pub attrs: Option<PropValue<Attr>>,

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Draw a cursor after the text (default: true).
    pub show_cursor: bool,

    /// Cursor glyph (default: "|").
    pub cursor_character: String,

    /// Blink half-cycle in ms (default: 500). Zero disables blinking.
    pub cursor_blink_duration: u64,

    /// Hide the cursor while a character is being typed or deleted.
    pub hide_cursor_while_typing: bool,

    // =========================================================================
    // Activation & Events
    // =========================================================================

    /// Hold the animation until the element is at least 10% visible.
    pub start_on_visible: bool,

    /// Called with `(sentence, index)` when a sentence completes.
    pub on_sentence_complete: Option<SentenceCallback>,
}

impl Default for TypewriterProps {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            id: None,
            text: TextSource::default(),
            reverse_mode: false,
            loop_text: timing.loop_text,
            typing_speed: timing.typing_speed,
            deleting_speed: timing.deleting_speed,
            initial_delay: timing.initial_delay,
            pause_duration: timing.pause_duration,
            variable_speed: None,
            seed: None,
            text_colors: Vec::new(),
            fg: None,
            attrs: None,
            show_cursor: true,
            cursor_character: "|".to_string(),
            cursor_blink_duration: 500,
            hide_cursor_while_typing: false,
            start_on_visible: false,
            on_sentence_complete: None,
        }
    }
}

impl TypewriterProps {
    /// Timing parameters for the state machine. Inverted speed ranges are
    /// swapped here.
    pub fn timing(&self) -> Timing {
        Timing {
            typing_speed: self.typing_speed,
            deleting_speed: self.deleting_speed,
            initial_delay: self.initial_delay,
            pause_duration: self.pause_duration,
            variable_speed: self.variable_speed.map(SpeedRange::normalized),
            loop_text: self.loop_text,
        }
    }
}

impl fmt::Debug for TypewriterProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypewriterProps")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("timing", &self.timing())
            .field("reverse_mode", &self.reverse_mode)
            .field("text_colors", &self.text_colors)
            .field("show_cursor", &self.show_cursor)
            .field("cursor_character", &self.cursor_character)
            .field("start_on_visible", &self.start_on_visible)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;

    #[test]
    fn test_defaults() {
        let props = TypewriterProps::default();
        let timing = props.timing();
        assert_eq!(timing.typing_speed, 50);
        assert_eq!(timing.deleting_speed, 30);
        assert_eq!(timing.initial_delay, 0);
        assert_eq!(timing.pause_duration, 1000);
        assert!(!timing.loop_text);
        assert!(props.show_cursor);
        assert_eq!(props.cursor_character, "|");
    }

    #[test]
    fn test_text_source_conversions() {
        assert_eq!(TextSource::from("hi").sentences(), vec!["hi".to_string()]);
        assert_eq!(
            TextSource::from(vec!["a", "b"]).sentences(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(TextSource::Many(Vec::new()).sentences().is_empty());
    }

    #[test]
    fn test_timing_normalizes_speed_range() {
        let props = TypewriterProps {
            variable_speed: Some(SpeedRange { min: 80, max: 20 }),
            ..Default::default()
        };
        assert_eq!(props.timing().variable_speed, Some(SpeedRange { min: 20, max: 80 }));
    }

    #[test]
    fn test_prop_value_get() {
        let color = signal(Rgba::RED);
        let prop: PropValue<Rgba> = color.clone().into();
        assert_eq!(prop.get(), Rgba::RED);
        color.set(Rgba::BLUE);
        assert_eq!(prop.get(), Rgba::BLUE);

        let getter = PropValue::Getter(Rc::new(|| Attr::BOLD));
        assert_eq!(getter.get(), Attr::BOLD);
    }
}
