//! List nesting and the numbering id of the current top-level list

use crate::error::{OoxmlError, Result};

/// Nesting depth plus the numbering id shared by one top-level list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListContext {
    depth: usize,
    num_id: Option<u32>,
}

impl ListContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lists currently open
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether entering a list now starts a new top-level list
    pub fn is_top_level(&self) -> bool {
        self.depth < 1
    }

    /// Enter a list level; `num_id` is recorded only for a top-level list
    pub fn enter(&mut self, num_id: Option<u32>) {
        if self.is_top_level() {
            self.num_id = num_id;
        }
        self.depth += 1;
    }

    /// Leave a list level, abandoning the numbering id at depth zero
    pub fn leave(&mut self) -> Result<()> {
        self.depth = self.depth.checked_sub(1).ok_or(OoxmlError::ListUnderflow)?;
        if self.depth == 0 {
            self.num_id = None;
        }
        Ok(())
    }

    /// Level index (`w:ilvl`) for items of the innermost list
    pub fn level(&self) -> usize {
        self.depth.saturating_sub(1)
    }

    /// Numbering id of the current top-level list
    pub fn num_id(&self) -> Option<u32> {
        self.num_id
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_levels_share_num_id() {
        let mut ctx = ListContext::new();
        assert!(ctx.is_top_level());
        ctx.enter(Some(4));
        assert_eq!((ctx.level(), ctx.num_id()), (0, Some(4)));

        assert!(!ctx.is_top_level());
        ctx.enter(Some(99));
        assert_eq!((ctx.level(), ctx.num_id()), (1, Some(4)));

        ctx.leave().unwrap();
        assert_eq!((ctx.level(), ctx.num_id()), (0, Some(4)));
    }

    #[test]
    fn test_leaving_outermost_abandons_num_id() {
        let mut ctx = ListContext::new();
        ctx.enter(Some(1));
        ctx.leave().unwrap();
        assert_eq!(ctx.num_id(), None);
        assert!(ctx.is_top_level());
    }

    #[test]
    fn test_leave_underflow() {
        let mut ctx = ListContext::new();
        assert!(matches!(ctx.leave(), Err(OoxmlError::ListUnderflow)));
    }
}
