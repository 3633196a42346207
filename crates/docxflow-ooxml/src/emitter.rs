//! Event-driven WordprocessingML body emitter
//!
//! [`DocxEmitter`] receives one formatting event at a time and appends the
//! matching `w:body` markup to its output. It never looks back at what it
//! wrote, with one exception: tables are written into a side buffer until
//! their column count is known, then spliced behind their `w:tblGrid`.
//!
//! # Example
//!
//! ```
//! use docxflow_ooxml::{EmitterConfig, RenderSession};
//!
//! let mut session = RenderSession::offline(EmitterConfig::default());
//! let mut emitter = session.emitter();
//! emitter.start_document();
//! emitter.start_paragraph(None)?;
//! emitter.start_bold(None);
//! emitter.handle_string("Hello");
//! emitter.end_bold();
//! emitter.end_paragraph()?;
//! emitter.end_document()?;
//!
//! let fragment = emitter.finish()?;
//! assert_eq!(
//!     fragment.markup,
//!     "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">Hello</w:t></w:r></w:p>"
//! );
//! # Ok::<(), docxflow_ooxml::OoxmlError>(())
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::blocks::{BlockFrame, BlockKind, BlockStack, NumberingRef, PAGE_BREAK_PARAGRAPH};
use crate::data_url::parse_data_url;
use crate::error::{OoxmlError, Result};
use crate::formatting::{FormattingState, SpanStack};
use crate::image::ImageProvider;
use crate::list::ListContext;
use crate::properties::{
    CaptionProperties, HeaderProperties, ListItemProperties, ListProperties, ParagraphProperties,
    RunProperties, SpanProperties, TableProperties, Toggle,
};
use crate::session::RenderSession;
use crate::sink::OutputSink;
use crate::xml::{escape_text, normalize_text, unescape_predefined};

const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PICTURE_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// A non-fatal problem met while emitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitWarning {
    /// The offending reference, shortened for display
    pub reference: String,
    pub message: String,
}

impl fmt::Display for EmitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reference, self.message)
    }
}

/// Result of one emitted fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The `w:body` markup
    pub markup: String,
    /// Images that were skipped, in event order
    pub warnings: Vec<EmitWarning>,
}

/// Column bookkeeping for one open table
#[derive(Debug, Clone, Default)]
struct TableFrame {
    properties: TableProperties,
    widest_row: usize,
    cells_in_row: usize,
}

impl TableFrame {
    fn finish_row(&mut self) {
        self.widest_row = self.widest_row.max(self.cells_in_row);
        self.cells_in_row = 0;
    }

    fn column_count(&self) -> usize {
        self.properties
            .column_count
            .unwrap_or_else(|| self.widest_row.max(self.cells_in_row))
    }
}

macro_rules! toggle_events {
    ($($start:ident, $end:ident => $toggle:ident;)*) => {
        $(
            #[doc = concat!("Switch ", stringify!($toggle), " on, capturing any colours in `properties`")]
            pub fn $start(&mut self, properties: Option<&SpanProperties>) {
                self.start_formatting(Toggle::$toggle, properties);
            }

            #[doc = concat!("Switch ", stringify!($toggle), " off")]
            pub fn $end(&mut self) {
                self.end_formatting(Toggle::$toggle);
            }
        )*
    };
}

/// Emitter for one fragment, bound to the session of its document
pub struct DocxEmitter<'s> {
    session: &'s mut RenderSession,
    sink: OutputSink,
    formatting: FormattingState,
    spans: SpanStack,
    blocks: BlockStack,
    list: ListContext,
    tables: Vec<TableFrame>,
    /// Line breaks waiting for the next run
    pending_breaks: usize,
    /// Set once any block has been opened; before that, runs are bare
    paragraph_inserted: bool,
    /// A heading or caption run is open and receives raw text
    inside_bare_run: bool,
    warnings: Vec<EmitWarning>,
}

impl<'s> DocxEmitter<'s> {
    pub fn new(session: &'s mut RenderSession) -> Self {
        Self {
            session,
            sink: OutputSink::new(),
            formatting: FormattingState::new(),
            spans: SpanStack::new(),
            blocks: BlockStack::new(),
            list: ListContext::new(),
            tables: Vec::new(),
            pending_breaks: 0,
            paragraph_inserted: false,
            inside_bare_run: false,
            warnings: Vec::new(),
        }
    }

    // ----- document -----

    pub fn start_document(&mut self) {
        self.formatting = FormattingState::new();
        self.spans.clear();
        self.blocks = BlockStack::new();
        self.pending_breaks = 0;
    }

    /// Close every block still open, innermost first
    pub fn end_document(&mut self) -> Result<()> {
        while !self.blocks.is_empty() {
            self.end_block()?;
        }
        self.spans.clear();
        Ok(())
    }

    // ----- inline formatting -----

    /// Switch an ambient toggle on
    ///
    /// Colours in `properties` become pending and apply to the next
    /// serialised run properties only.
    pub fn start_formatting(&mut self, toggle: Toggle, properties: Option<&SpanProperties>) {
        self.formatting.set(toggle, true);
        if let Some(properties) = properties {
            self.formatting.capture_colors(properties);
        }
    }

    pub fn end_formatting(&mut self, toggle: Toggle) {
        self.formatting.set(toggle, false);
    }

    toggle_events! {
        start_bold, end_bold => Bold;
        start_italic, end_italic => Italic;
        start_underline, end_underline => Underline;
        start_strike, end_strike => Strike;
        start_subscript, end_subscript => Subscript;
        start_superscript, end_superscript => Superscript;
    }

    pub fn start_span(&mut self, properties: SpanProperties) {
        self.spans.push(properties);
    }

    pub fn end_span(&mut self) -> Result<()> {
        self.spans.pop().map(|_| ())
    }

    // ----- text -----

    /// Emit a text run with the effective formatting
    ///
    /// Inside a heading or caption the text joins the open bare run instead.
    pub fn handle_string(&mut self, content: &str) {
        let text = normalize_text(content);
        if self.inside_bare_run {
            self.sink.write(&text);
            return;
        }

        self.start_paragraph_if_needed();
        let effective = self.formatting.effective(self.spans.top());
        self.write_run(&effective, &text);
    }

    /// Queue a line break for the start of the next run
    pub fn handle_line_break(&mut self) {
        self.pending_breaks += 1;
    }

    fn write_run(&mut self, properties: &RunProperties, text: &str) {
        self.sink.write("<w:r>");
        if let Some(rpr) = properties.to_rpr() {
            self.sink.write(&rpr);
            self.formatting.clear_pending_colors();
        }
        for _ in 0..self.pending_breaks {
            self.sink.write("<w:br/>");
        }
        self.pending_breaks = 0;
        if !text.is_empty() {
            self.sink.write("<w:t xml:space=\"preserve\">");
            self.sink.write(text);
            self.sink.write("</w:t>");
        }
        self.sink.write("</w:r>");
    }

    // ----- blocks -----

    pub fn start_paragraph(&mut self, properties: Option<ParagraphProperties>) -> Result<()> {
        let style = properties.as_ref().and_then(|p| p.style_name.clone());
        self.start_block(
            BlockFrame::new(BlockKind::Paragraph)
                .with_style(style)
                .with_properties(properties),
        )
    }

    pub fn end_paragraph(&mut self) -> Result<()> {
        self.end_block()
    }

    pub fn start_heading(&mut self, level: u8, properties: Option<HeaderProperties>) -> Result<()> {
        let style = self.session.styles.heading_style_id(level);
        self.start_block(
            BlockFrame::new(BlockKind::Heading(level))
                .with_style(Some(style))
                .with_properties(properties),
        )?;
        self.open_bare_run();
        Ok(())
    }

    pub fn end_heading(&mut self) -> Result<()> {
        self.end_block()
    }

    pub fn start_figure_caption(&mut self, properties: Option<CaptionProperties>) -> Result<()> {
        self.start_caption(properties)
    }

    pub fn end_figure_caption(&mut self) -> Result<()> {
        self.end_block()
    }

    pub fn start_table_caption(&mut self, properties: Option<CaptionProperties>) -> Result<()> {
        self.start_caption(properties)
    }

    pub fn end_table_caption(&mut self) -> Result<()> {
        self.end_block()
    }

    fn start_caption(&mut self, properties: Option<CaptionProperties>) -> Result<()> {
        let style = self.session.styles.caption_style_id();
        self.start_block(
            BlockFrame::new(BlockKind::Caption)
                .with_style(Some(style))
                .with_properties(properties),
        )?;
        self.open_bare_run();
        Ok(())
    }

    /// Close the open paragraph (if any), then open `frame`
    ///
    /// A page-break-before paragraph goes between the two so it never nests.
    fn start_block(&mut self, frame: BlockFrame) -> Result<()> {
        self.close_current_paragraph()?;
        if frame
            .properties
            .as_ref()
            .is_some_and(|p| p.page_break_before)
        {
            self.sink.write(PAGE_BREAK_PARAGRAPH);
        }
        self.open_block(frame);
        Ok(())
    }

    fn open_block(&mut self, frame: BlockFrame) {
        self.paragraph_inserted = true;
        self.sink.write("<w:p>");
        if let Some(ppr) = frame.to_ppr() {
            self.sink.write(&ppr);
            if frame.has_run_overrides() {
                self.formatting.clear_pending_colors();
            }
        }
        self.blocks.push(frame);
    }

    fn end_block(&mut self) -> Result<()> {
        let frame = self.blocks.pop()?;
        if self.inside_bare_run {
            self.sink.write("</w:t></w:r>");
            self.inside_bare_run = false;
        }
        self.sink.write("</w:p>");
        if frame.page_break_after() {
            self.sink.write(PAGE_BREAK_PARAGRAPH);
        }
        Ok(())
    }

    fn close_current_paragraph(&mut self) -> Result<()> {
        if !self.blocks.is_empty() {
            self.end_block()?;
        }
        Ok(())
    }

    /// Open an implicit paragraph for loose content, unless the fragment is
    /// still inline (no block was ever opened)
    fn start_paragraph_if_needed(&mut self) {
        if self.paragraph_inserted && self.blocks.is_empty() {
            self.open_block(BlockFrame::new(BlockKind::Implicit));
        }
    }

    fn open_bare_run(&mut self) {
        self.sink.write("<w:r><w:t>");
        self.inside_bare_run = true;
    }

    /// Close an open heading run around embedded markup; returns whether it
    /// has to be reopened
    fn suspend_bare_run(&mut self) -> bool {
        if self.inside_bare_run {
            self.sink.write("</w:t></w:r>");
            self.inside_bare_run = false;
            true
        } else {
            false
        }
    }

    fn resume_bare_run(&mut self, suspended: bool) {
        if suspended {
            self.open_bare_run();
        }
    }

    // ----- lists -----

    pub fn start_ordered_list(&mut self, properties: Option<ListProperties>) {
        self.start_list(true, properties);
    }

    pub fn start_unordered_list(&mut self, properties: Option<ListProperties>) {
        self.start_list(false, properties);
    }

    pub fn end_ordered_list(&mut self) -> Result<()> {
        self.end_list()
    }

    pub fn end_unordered_list(&mut self) -> Result<()> {
        self.end_list()
    }

    fn start_list(&mut self, ordered: bool, _properties: Option<ListProperties>) {
        if self.pending_breaks > 0 {
            self.handle_string("");
        }

        if self.list.is_top_level() {
            let abstract_num_id = self.session.styles.abstract_num_id_for_list(ordered);
            let max_num_id = self.session.config.max_num_id;
            let definition = self
                .session
                .numbering
                .add_num(abstract_num_id, max_num_id, ordered);
            self.list.enter(Some(definition.num_id));
        } else {
            self.list.enter(None);
        }
    }

    fn end_list(&mut self) -> Result<()> {
        self.list.leave()?;
        self.close_current_paragraph()
    }

    /// Open a numbered paragraph at the current list level
    ///
    /// Outside any list the item refers to `w:numId` 0 (no numbering).
    pub fn start_list_item(&mut self, properties: Option<ListItemProperties>) -> Result<()> {
        let numbering = NumberingRef {
            level: self.list.level(),
            num_id: self.list.num_id().unwrap_or(0),
        };
        let style = properties.as_ref().and_then(|p| p.style_name.clone());
        self.start_block(
            BlockFrame::new(BlockKind::ListItem)
                .with_style(style)
                .with_numbering(numbering)
                .with_properties(properties),
        )
    }

    /// List items stay open until the next item or the end of the list
    pub fn end_list_item(&mut self) {}

    // ----- hyperlinks -----

    /// Emit a hyperlink run; the label defaults to the target
    pub fn handle_reference(&mut self, target: &str, label: Option<&str>) {
        let suspended = self.suspend_bare_run();
        if !suspended {
            self.start_paragraph_if_needed();
        }

        let rel_id = self
            .session
            .hyperlinks
            .register_hyperlink(&unescape_predefined(target));
        let style = self.session.styles.hyperlink_style_id();
        let text = match label.filter(|l| !l.is_empty()) {
            Some(label) => normalize_text(label),
            None => normalize_text(target),
        };

        self.sink.write(&format!(
            "<w:hyperlink r:id=\"{}\" w:history=\"1\">",
            escape_text(&rel_id)
        ));
        self.sink.write(&format!(
            "<w:r><w:rPr><w:rStyle w:val=\"{}\"/></w:rPr>",
            escape_text(&style)
        ));
        self.sink.write("<w:t xml:space=\"preserve\">");
        self.sink.write(&text);
        self.sink.write("</w:t></w:r></w:hyperlink>");

        self.resume_bare_run(suspended);
    }

    // ----- images -----

    /// Embed an inline image
    ///
    /// `reference` is a data URL or a regular URL. Explicit pixel sizes win
    /// over the intrinsic size. Images that cannot be loaded or sized are
    /// skipped and reported through [`DocxEmitter::warnings`].
    pub fn handle_image(
        &mut self,
        reference: &str,
        label: Option<&str>,
        width: Option<u32>,
        height: Option<u32>,
    ) {
        let mut provider = match self.load_image(reference) {
            Ok(provider) => provider,
            Err(e) => {
                self.warn_skipped(reference, &e);
                return;
            }
        };
        if let Some(width) = width {
            provider.set_width(width as f32);
        }
        if let Some(height) = height {
            provider.set_height(height as f32);
        }
        let (Some(width), Some(height)) = (provider.width(), provider.height()) else {
            let e = OoxmlError::MissingDimensions(abbreviate(reference));
            self.warn_skipped(reference, &e);
            return;
        };

        let info = self.session.images.register_image(&provider);
        let cx = self.session.images.size_to_emu(width);
        let cy = self.session.images.size_to_emu(height);
        let name = match label.filter(|l| !l.is_empty()) {
            Some(label) => normalize_text(label),
            None => escape_text(&info.rel_id),
        };
        let drawing_id = info.drawing_id;
        let rel_id = escape_text(&info.rel_id);

        let suspended = self.suspend_bare_run();
        if !suspended {
            self.start_paragraph_if_needed();
        }

        let mut xml = String::new();
        xml.push_str("<w:r><w:drawing>");
        xml.push_str("<wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">");
        xml.push_str(&format!("<wp:extent cx=\"{}\" cy=\"{}\"/>", cx, cy));
        xml.push_str("<wp:effectExtent t=\"0\" b=\"0\" l=\"0\" r=\"0\"/>");
        xml.push_str(&format!(
            "<wp:docPr id=\"{}\" name=\"{}\"/>",
            drawing_id, name
        ));
        xml.push_str(&format!(
            "<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a=\"{}\" noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>",
            DRAWINGML_NS
        ));
        xml.push_str(&format!("<a:graphic xmlns:a=\"{}\">", DRAWINGML_NS));
        xml.push_str(&format!("<a:graphicData uri=\"{}\">", PICTURE_NS));
        xml.push_str(&format!("<pic:pic xmlns:pic=\"{}\">", PICTURE_NS));
        xml.push_str(&format!(
            "<pic:nvPicPr><pic:cNvPr id=\"{}\" name=\"{}\" title=\"{}\"/><pic:cNvPicPr/></pic:nvPicPr>",
            drawing_id, name, name
        ));
        xml.push_str(&format!(
            "<pic:blipFill><a:blip r:embed=\"{}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>",
            rel_id
        ));
        xml.push_str(&format!(
            "<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
            cx, cy
        ));
        xml.push_str("<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>");
        xml.push_str("</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>");
        self.sink.write(&xml);

        self.resume_bare_run(suspended);
    }

    fn load_image(&self, reference: &str) -> Result<ImageProvider> {
        if let Some(data) = parse_data_url(reference)? {
            return Ok(ImageProvider::new(data.data, Some(&data.mime_type)));
        }

        let fetcher = self
            .session
            .fetcher
            .as_deref()
            .ok_or_else(|| OoxmlError::Fetch {
                url: abbreviate(reference),
                message: "remote image fetching is disabled".to_string(),
            })?;
        let bytes = fetcher.fetch(reference)?;
        Ok(ImageProvider::new(bytes, None))
    }

    fn warn_skipped(&mut self, reference: &str, error: &OoxmlError) {
        let reference = abbreviate(reference);
        warn!(reference = %reference, error = %error, "skipping image");
        self.warnings.push(EmitWarning {
            reference,
            message: error.to_string(),
        });
    }

    // ----- tables -----

    /// Open a table; its rows are buffered until [`DocxEmitter::end_table`]
    pub fn start_table(&mut self, properties: TableProperties) -> Result<()> {
        self.close_current_paragraph()?;
        self.tables.push(TableFrame {
            properties,
            ..TableFrame::default()
        });
        self.sink.push_buffer();
        Ok(())
    }

    /// Write the table head and grid, then the buffered rows
    pub fn end_table(&mut self) -> Result<()> {
        let table = self.tables.pop().ok_or(OoxmlError::TableUnderflow)?;
        let columns = table.column_count();
        debug!(
            columns,
            declared = table.properties.column_count.is_some(),
            "sized table grid"
        );

        let mut head = String::from("<w:tbl>");
        if let Some(style) = &table.properties.style_name {
            head.push_str(&format!(
                "<w:tblPr><w:tblStyle w:val=\"{}\"/></w:tblPr>",
                escape_text(style)
            ));
        }
        head.push_str("<w:tblGrid>");
        let grid_col = format!(
            "<w:gridCol w:w=\"{}\"/>",
            self.session.config.grid_column_width
        );
        for _ in 0..columns {
            head.push_str(&grid_col);
        }
        head.push_str("</w:tblGrid>");

        self.sink.pop_buffer_behind(&head)?;
        // A table nested in a cell must be followed by a paragraph.
        self.sink.write("</w:tbl><w:p/>");
        Ok(())
    }

    pub fn start_table_row(&mut self) -> Result<()> {
        let table = self.tables.last_mut().ok_or(OoxmlError::TableUnderflow)?;
        table.cells_in_row = 0;
        self.sink.write("<w:tr>");
        Ok(())
    }

    pub fn end_table_row(&mut self) -> Result<()> {
        let table = self.tables.last_mut().ok_or(OoxmlError::TableUnderflow)?;
        table.finish_row();
        self.sink.write("</w:tr>");
        Ok(())
    }

    /// Open a cell together with its implicit paragraph
    pub fn start_table_cell(&mut self) -> Result<()> {
        let table = self.tables.last_mut().ok_or(OoxmlError::TableUnderflow)?;
        table.cells_in_row += 1;
        self.sink.write("<w:tc>");
        self.open_block(BlockFrame::new(BlockKind::TableCell));
        Ok(())
    }

    /// Close a cell; a nested table may already have closed its paragraph
    pub fn end_table_cell(&mut self) -> Result<()> {
        if self.tables.is_empty() {
            return Err(OoxmlError::TableUnderflow);
        }
        self.close_current_paragraph()?;
        self.sink.write("</w:tc>");
        Ok(())
    }

    // ----- output -----

    /// Skipped images so far
    pub fn warnings(&self) -> &[EmitWarning] {
        &self.warnings
    }

    /// Markup written outside any table buffer so far
    pub fn output(&self) -> &str {
        self.sink.as_str()
    }

    pub fn block_depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn list_depth(&self) -> usize {
        self.list.depth()
    }

    /// Take the emitted markup and warnings
    ///
    /// Fails with `UnclosedTable` if a table is still open.
    pub fn finish(self) -> Result<Fragment> {
        Ok(Fragment {
            markup: self.sink.into_string()?,
            warnings: self.warnings,
        })
    }
}

/// Shorten long references (data URLs) for logs and warnings
fn abbreviate(reference: &str) -> String {
    const MAX_CHARS: usize = 64;
    if reference.chars().count() <= MAX_CHARS {
        reference.to_string()
    } else {
        let head: String = reference.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitterConfig;

    fn session() -> RenderSession {
        RenderSession::offline(EmitterConfig::default())
    }

    #[test]
    fn test_bare_run_before_any_block() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.start_document();
        emitter.handle_string("inline");
        emitter.end_document().unwrap();
        assert_eq!(
            emitter.finish().unwrap().markup,
            "<w:r><w:t xml:space=\"preserve\">inline</w:t></w:r>"
        );
    }

    #[test]
    fn test_implicit_paragraph_after_first_block() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.start_document();
        emitter.start_paragraph(None).unwrap();
        emitter.end_paragraph().unwrap();
        emitter.handle_string("loose");
        assert_eq!(emitter.block_depth(), 1);
        emitter.end_document().unwrap();
        assert_eq!(
            emitter.finish().unwrap().markup,
            "<w:p></w:p><w:p><w:r><w:t xml:space=\"preserve\">loose</w:t></w:r></w:p>"
        );
    }

    #[test]
    fn test_empty_string_keeps_run_wrapper() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.handle_string("");
        assert_eq!(emitter.output(), "<w:r></w:r>");
    }

    #[test]
    fn test_text_is_escaped_once() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.handle_string("a &amp; b < c");
        assert!(emitter.output().contains(">a &amp; b &lt; c<"));
    }

    #[test]
    fn test_line_breaks_flush_into_next_run() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.handle_line_break();
        emitter.handle_line_break();
        emitter.handle_string("x");
        emitter.handle_string("y");
        assert_eq!(
            emitter.output(),
            "<w:r><w:br/><w:br/><w:t xml:space=\"preserve\">x</w:t></w:r>\
             <w:r><w:t xml:space=\"preserve\">y</w:t></w:r>"
        );
    }

    #[test]
    fn test_pending_color_is_one_shot() {
        let mut session = session();
        let mut emitter = session.emitter();
        let red = SpanProperties {
            text_color: Some("ff0000".to_string()),
            ..SpanProperties::default()
        };
        emitter.start_bold(Some(&red));
        emitter.handle_string("a");
        emitter.handle_string("b");
        emitter.end_bold();
        let out = emitter.output();
        assert_eq!(out.matches("<w:color w:val=\"ff0000\"/>").count(), 1);
        assert_eq!(out.matches("<w:b/>").count(), 2);
    }

    #[test]
    fn test_span_supplies_unset_toggles() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.start_span(SpanProperties {
            italic: true,
            ..SpanProperties::default()
        });
        emitter.start_bold(None);
        emitter.handle_string("x");
        emitter.end_bold();
        emitter.end_span().unwrap();
        emitter.handle_string("y");
        let out = emitter.output();
        assert!(out.starts_with("<w:r><w:rPr><w:b/><w:i/></w:rPr>"));
        assert!(out.ends_with("<w:r><w:t xml:space=\"preserve\">y</w:t></w:r>"));
    }

    #[test]
    fn test_underflow_errors() {
        let mut session = session();
        let mut emitter = session.emitter();
        assert!(matches!(emitter.end_span(), Err(OoxmlError::SpanUnderflow)));
        assert!(matches!(
            emitter.end_paragraph(),
            Err(OoxmlError::BlockUnderflow)
        ));
        assert!(matches!(
            emitter.end_ordered_list(),
            Err(OoxmlError::ListUnderflow)
        ));
        assert!(matches!(emitter.end_table(), Err(OoxmlError::TableUnderflow)));
        assert!(matches!(
            emitter.start_table_cell(),
            Err(OoxmlError::TableUnderflow)
        ));
    }

    #[test]
    fn test_heading_text_is_written_raw() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.start_heading(2, None).unwrap();
        emitter.start_bold(None);
        emitter.handle_string("Title & more");
        emitter.end_heading().unwrap();
        assert_eq!(
            emitter.output(),
            "<w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr>\
             <w:r><w:t>Title &amp; more</w:t></w:r></w:p>"
        );
    }

    #[test]
    fn test_unclosed_table_fails_finish() {
        let mut session = session();
        let mut emitter = session.emitter();
        emitter.start_table(TableProperties::default()).unwrap();
        emitter.end_document().unwrap();
        assert!(matches!(emitter.finish(), Err(OoxmlError::UnclosedTable(1))));
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("short"), "short");
        let long = format!("data:image/png;base64,{}", "A".repeat(100));
        let short = abbreviate(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 67);
    }
}
