//! Paragraph-like block frames
//!
//! The block stack mirrors the `w:p` elements currently open in the output.
//! Every push writes an opening tag and every pop writes the matching close,
//! so the stack must be empty when the document ends.

use crate::error::{OoxmlError, Result};
use crate::properties::ContainerProperties;

/// What opened a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    ListItem,
    Heading(u8),
    Caption,
    /// Implicit paragraph of a table cell
    TableCell,
    /// Paragraph opened on demand for loose inline content
    Implicit,
}

/// Reference into numbering.xml carried by list items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingRef {
    /// Level index (`w:ilvl`)
    pub level: usize,
    /// Numbering definition id (`w:numId`)
    pub num_id: u32,
}

/// One open block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFrame {
    pub kind: BlockKind,
    /// Resolved paragraph style id
    pub style: Option<String>,
    pub numbering: Option<NumberingRef>,
    pub properties: Option<ContainerProperties>,
}

impl BlockFrame {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            style: None,
            numbering: None,
            properties: None,
        }
    }

    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }

    pub fn with_numbering(mut self, numbering: NumberingRef) -> Self {
        self.numbering = Some(numbering);
        self
    }

    pub fn with_properties(mut self, properties: Option<ContainerProperties>) -> Self {
        self.properties = properties;
        self
    }

    pub fn is_list_item(&self) -> bool {
        self.numbering.is_some()
    }

    pub fn page_break_after(&self) -> bool {
        self.properties
            .as_ref()
            .is_some_and(|p| p.page_break_after)
    }

    /// Whether the paragraph mark carries run-property overrides
    pub fn has_run_overrides(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.run.is_empty())
    }

    /// Serialise the `w:pPr` element in schema order
    /// (`pStyle`, `numPr`, `jc`, `rPr`), or `None` if nothing is set
    pub fn to_ppr(&self) -> Option<String> {
        let mut inner = String::new();

        if let Some(style) = &self.style {
            inner.push_str(&format!(
                "<w:pStyle w:val=\"{}\"/>",
                crate::xml::escape_text(style)
            ));
        }
        if let Some(numbering) = self.numbering {
            inner.push_str(&format!(
                "<w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr>",
                numbering.level, numbering.num_id
            ));
        }
        if let Some(properties) = &self.properties {
            if let Some(jc) = properties.alignment.and_then(|a| a.jc_value()) {
                inner.push_str(&format!("<w:jc w:val=\"{}\"/>", jc));
            }
            if let Some(rpr) = properties.run.to_rpr() {
                inner.push_str(&rpr);
            }
        }

        if inner.is_empty() {
            None
        } else {
            Some(format!("<w:pPr>{}</w:pPr>", inner))
        }
    }
}

/// Stack of open blocks
#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    frames: Vec<BlockFrame>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: BlockFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost block
    pub fn pop(&mut self) -> Result<BlockFrame> {
        self.frames.pop().ok_or(OoxmlError::BlockUnderflow)
    }

    pub fn top(&self) -> Option<&BlockFrame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Standalone paragraph holding a single page break
pub const PAGE_BREAK_PARAGRAPH: &str = "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{RunProperties, TextAlignment};

    #[test]
    fn test_plain_frame_has_no_ppr() {
        assert_eq!(BlockFrame::new(BlockKind::Paragraph).to_ppr(), None);
    }

    #[test]
    fn test_inherit_alignment_alone_has_no_ppr() {
        let frame = BlockFrame::new(BlockKind::Paragraph).with_properties(Some(
            ContainerProperties {
                alignment: Some(TextAlignment::Inherit),
                ..Default::default()
            },
        ));
        assert_eq!(frame.to_ppr(), None);
    }

    #[test]
    fn test_ppr_schema_order() {
        let frame = BlockFrame::new(BlockKind::ListItem)
            .with_style(Some("ListParagraph".to_string()))
            .with_numbering(NumberingRef {
                level: 1,
                num_id: 7,
            })
            .with_properties(Some(ContainerProperties {
                alignment: Some(TextAlignment::Center),
                run: RunProperties {
                    bold: true,
                    ..Default::default()
                },
                ..Default::default()
            }));

        assert_eq!(
            frame.to_ppr().unwrap(),
            "<w:pPr><w:pStyle w:val=\"ListParagraph\"/>\
             <w:numPr><w:ilvl w:val=\"1\"/><w:numId w:val=\"7\"/></w:numPr>\
             <w:jc w:val=\"center\"/><w:rPr><w:b/></w:rPr></w:pPr>"
        );
        assert!(frame.is_list_item());
        assert!(frame.has_run_overrides());
    }

    #[test]
    fn test_page_break_after_flag() {
        let frame = BlockFrame::new(BlockKind::Paragraph).with_properties(Some(
            ContainerProperties {
                page_break_after: true,
                ..Default::default()
            },
        ));
        assert!(frame.page_break_after());
        assert!(!BlockFrame::new(BlockKind::Paragraph).page_break_after());
    }

    #[test]
    fn test_block_stack_underflow() {
        let mut stack = BlockStack::new();
        stack.push(BlockFrame::new(BlockKind::Caption));
        assert_eq!(stack.pop().unwrap().kind, BlockKind::Caption);
        assert!(matches!(stack.pop(), Err(OoxmlError::BlockUnderflow)));
    }
}
