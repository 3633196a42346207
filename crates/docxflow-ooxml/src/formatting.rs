//! Ambient formatting state and the inline span stack
//!
//! Toggles (bold, italic, ...) are ambient flags switched by explicit start
//! and end events. Colours are one-shot: a styled start event records them as
//! pending and the next serialised run properties consume them. Spans push
//! immutable property snapshots whose values fill in whatever the ambient
//! state leaves unset.

use crate::error::{OoxmlError, Result};
use crate::properties::{RunProperties, SpanProperties, Toggle};

/// Ambient toggles plus pending one-shot colours for one render session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub subscript: bool,
    pub superscript: bool,
    /// Pending text colour, consumed by the next `w:rPr`
    pub text_color: Option<String>,
    /// Pending highlight colour, consumed by the next `w:rPr`
    pub highlight: Option<String>,
}

impl FormattingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear one ambient toggle
    pub fn set(&mut self, toggle: Toggle, on: bool) {
        let flag = match toggle {
            Toggle::Bold => &mut self.bold,
            Toggle::Italic => &mut self.italic,
            Toggle::Underline => &mut self.underline,
            Toggle::Strike => &mut self.strike,
            Toggle::Subscript => &mut self.subscript,
            Toggle::Superscript => &mut self.superscript,
        };
        *flag = on;
    }

    /// Record the colours a styled start event carries
    ///
    /// Absent colours leave any already-pending value alone.
    pub fn capture_colors(&mut self, properties: &SpanProperties) {
        if let Some(color) = &properties.text_color {
            self.text_color = Some(color.clone());
        }
        if let Some(highlight) = &properties.highlight {
            self.highlight = Some(highlight.clone());
        }
    }

    /// Drop pending colours once they have been serialised
    pub fn clear_pending_colors(&mut self) {
        self.text_color = None;
        self.highlight = None;
    }

    /// Compute the formatting of a run given the innermost open span
    ///
    /// A toggle set here always wins; an unset one defers to the span.
    pub fn effective(&self, span: Option<&SpanProperties>) -> RunProperties {
        let inherited = |own: bool, pick: fn(&SpanProperties) -> bool| -> bool {
            own || span.map(pick).unwrap_or(false)
        };

        RunProperties {
            bold: inherited(self.bold, |s| s.bold),
            italic: inherited(self.italic, |s| s.italic),
            underline: inherited(self.underline, |s| s.underline),
            strike: inherited(self.strike, |s| s.strike),
            subscript: inherited(self.subscript, |s| s.subscript),
            superscript: inherited(self.superscript, |s| s.superscript),
            text_color: self
                .text_color
                .clone()
                .or_else(|| span.and_then(|s| s.text_color.clone())),
            highlight: self
                .highlight
                .clone()
                .or_else(|| span.and_then(|s| s.highlight.clone())),
        }
    }
}

/// Stack of open inline spans
#[derive(Debug, Clone, Default)]
pub struct SpanStack {
    frames: Vec<SpanProperties>,
}

impl SpanStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, properties: SpanProperties) {
        self.frames.push(properties);
    }

    /// Close the innermost span
    pub fn pop(&mut self) -> Result<SpanProperties> {
        self.frames.pop().ok_or(OoxmlError::SpanUnderflow)
    }

    /// Innermost open span
    pub fn top(&self) -> Option<&SpanProperties> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
