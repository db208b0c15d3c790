//! Single-line renderer.
//!
//! The LineRenderer writes one typewriter [`Frame`] at a terminal position.
//! It remembers the last frame and position and outputs nothing when both
//! are unchanged, so the host can call it every loop iteration.
//!
//! # Output
//!
//! 1. Begin synchronized update
//! 2. Clear the previously drawn row (if the element moved) and the target row
//! 3. Text in the frame color and attributes, clipped to the line width
//! 4. Cursor glyph, dimmed by its opacity
//!
//! Output never wraps. When the text is wider than the line, the tail is
//! shown so the typing position stays visible.
//! 5. Reset styles, end synchronized update, flush

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};
use unicode_width::UnicodeWidthChar;

use crate::primitives::Frame;
use crate::types::Attr;

/// Opacity steps rendered distinctly; finer changes are not redrawn.
const OPACITY_LEVELS: f32 = 16.0;

/// Where a line is drawn: column, row and width in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSlot {
    pub column: u16,
    pub row: u16,
    pub width: u16,
}

/// Renders typewriter frames onto one row of a terminal.
pub struct LineRenderer<W: Write> {
    out: W,
    previous: Option<(Frame, Option<LineSlot>)>,
}

impl LineRenderer<io::Stdout> {
    /// Renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LineRenderer<W> {
    /// Create a renderer over any writer.
    pub fn new(out: W) -> Self {
        Self { out, previous: None }
    }

    /// Access the underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Forget the previous frame so the next render redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Render `frame` into `slot`; `None` means off-screen.
    ///
    /// Returns true if anything was written.
    pub fn render(&mut self, frame: &Frame, slot: Option<LineSlot>) -> io::Result<bool> {
        let frame = quantize(frame);
        if let Some((prev_frame, prev_slot)) = &self.previous {
            if *prev_frame == frame && *prev_slot == slot {
                return Ok(false);
            }
        }

        queue!(self.out, BeginSynchronizedUpdate)?;

        let prev_row = self.previous.as_ref().and_then(|(_, s)| s.map(|s| s.row));
        if let Some(row) = prev_row {
            if slot.map(|s| s.row) != Some(row) {
                queue!(self.out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
            }
        }

        if let Some(slot) = slot {
            let budget = slot.width as usize;
            let glyph = frame.cursor.as_ref().map(|c| c.glyph.as_str()).unwrap_or("");
            let glyph_width = str_width(glyph);
            let text = fit_tail(&frame.text, budget.saturating_sub(glyph_width));

            queue!(self.out, MoveTo(slot.column, slot.row), Clear(ClearType::UntilNewLine))?;
            write_attrs(&mut self.out, frame.attrs)?;
            queue!(self.out, SetForegroundColor(frame.fg.to_crossterm()), Print(text))?;
            if let Some(cursor) = &frame.cursor {
                if cursor.opacity > 0.0 && glyph_width <= budget {
                    let color = frame.fg.dim(cursor.opacity);
                    queue!(self.out, SetForegroundColor(color.to_crossterm()), Print(&cursor.glyph))?;
                }
            }
            queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some((frame, slot));
        Ok(true)
    }
}

fn str_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Longest suffix of `text` that fits in `budget` cells.
fn fit_tail(text: &str, budget: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > budget {
            break;
        }
        start = i;
    }
    &text[start..]
}

fn write_attrs<W: Write>(out: &mut W, attrs: Attr) -> io::Result<()> {
    let mapping = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ];
    for (flag, attribute) in mapping {
        if attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

/// Round cursor opacity so a blinking cursor redraws a bounded number of
/// times per half-cycle.
fn quantize(frame: &Frame) -> Frame {
    let mut frame = frame.clone();
    if let Some(cursor) = frame.cursor.as_mut() {
        cursor.opacity = (cursor.opacity * OPACITY_LEVELS).round() / OPACITY_LEVELS;
    }
    frame
}
