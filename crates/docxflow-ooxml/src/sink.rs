//! Output sink with buffer redirection
//!
//! Markup is appended in call order. A table cannot write its grid until all
//! of its rows are known, so the sink can redirect writes into a fresh buffer
//! and later splice that buffer into the enclosing target behind a prefix.

use crate::error::{OoxmlError, Result};

/// Append-only text sink backed by a stack of write targets
#[derive(Debug, Clone)]
pub struct OutputSink {
    /// Base target followed by any pushed buffers; writes go to the last one
    targets: Vec<String>,
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink {
    /// Create a sink with an empty base target
    pub fn new() -> Self {
        Self {
            targets: vec![String::new()],
        }
    }

    /// Append markup to the current target
    pub fn write(&mut self, markup: &str) {
        if let Some(target) = self.targets.last_mut() {
            target.push_str(markup);
        }
    }

    /// Redirect subsequent writes into a fresh buffer
    pub fn push_buffer(&mut self) {
        self.targets.push(String::new());
    }

    /// Remove the current buffer and return what was written into it
    pub fn pop_buffer(&mut self) -> Result<String> {
        if self.targets.len() < 2 {
            return Err(OoxmlError::SinkUnderflow);
        }
        self.targets.pop().ok_or(OoxmlError::SinkUnderflow)
    }

    /// Pop the current buffer and write `prefix` followed by its content
    /// into the enclosing target
    pub fn pop_buffer_behind(&mut self, prefix: &str) -> Result<()> {
        let buffered = self.pop_buffer()?;
        self.write(prefix);
        self.write(&buffered);
        Ok(())
    }

    /// Number of pushed buffers above the base target
    pub fn depth(&self) -> usize {
        self.targets.len() - 1
    }

    /// Content written to the base target so far
    pub fn as_str(&self) -> &str {
        &self.targets[0]
    }

    /// Consume the sink and return the base target
    ///
    /// Fails if buffers are still pushed, since their content would be lost.
    pub fn into_string(mut self) -> Result<String> {
        match self.depth() {
            0 => Ok(self.targets.swap_remove(0)),
            open => Err(OoxmlError::UnclosedTable(open)),
        }
    }
}
