//! Serialisable emitter events
//!
//! An [`Event`] mirrors one [`DocxEmitter`] call, so an event stream recorded
//! as JSON can be replayed without writing Rust:
//!
//! ```json
//! [
//!   {"event": "start_paragraph", "properties": {"alignment": "center"}},
//!   {"event": "start_formatting", "toggle": "bold"},
//!   {"event": "text", "content": "Hello"},
//!   {"event": "end_formatting", "toggle": "bold"},
//!   {"event": "end_paragraph"}
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::emitter::DocxEmitter;
use crate::error::Result;
use crate::properties::{ContainerProperties, SpanProperties, TableProperties, Toggle};

/// One emitter call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    StartDocument,
    EndDocument,
    StartFormatting {
        toggle: Toggle,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<SpanProperties>,
    },
    EndFormatting {
        toggle: Toggle,
    },
    StartSpan {
        #[serde(default)]
        properties: SpanProperties,
    },
    EndSpan,
    Text {
        content: String,
    },
    LineBreak,
    StartParagraph {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndParagraph,
    StartOrderedList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndOrderedList,
    StartUnorderedList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndUnorderedList,
    StartListItem {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndListItem,
    StartHeading {
        level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndHeading,
    StartFigureCaption {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndFigureCaption,
    StartTableCaption {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<ContainerProperties>,
    },
    EndTableCaption,
    Reference {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Image {
        reference: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    StartTable {
        #[serde(default)]
        properties: TableProperties,
    },
    EndTable,
    StartTableRow,
    EndTableRow,
    StartTableCell,
    EndTableCell,
}

impl Event {
    /// Forward this event to the emitter
    pub fn apply(self, emitter: &mut DocxEmitter<'_>) -> Result<()> {
        match self {
            Event::StartDocument => emitter.start_document(),
            Event::EndDocument => emitter.end_document()?,
            Event::StartFormatting { toggle, properties } => {
                emitter.start_formatting(toggle, properties.as_ref())
            }
            Event::EndFormatting { toggle } => emitter.end_formatting(toggle),
            Event::StartSpan { properties } => emitter.start_span(properties),
            Event::EndSpan => emitter.end_span()?,
            Event::Text { content } => emitter.handle_string(&content),
            Event::LineBreak => emitter.handle_line_break(),
            Event::StartParagraph { properties } => emitter.start_paragraph(properties)?,
            Event::EndParagraph => emitter.end_paragraph()?,
            Event::StartOrderedList { properties } => emitter.start_ordered_list(properties),
            Event::EndOrderedList => emitter.end_ordered_list()?,
            Event::StartUnorderedList { properties } => emitter.start_unordered_list(properties),
            Event::EndUnorderedList => emitter.end_unordered_list()?,
            Event::StartListItem { properties } => emitter.start_list_item(properties)?,
            Event::EndListItem => emitter.end_list_item(),
            Event::StartHeading { level, properties } => {
                emitter.start_heading(level, properties)?
            }
            Event::EndHeading => emitter.end_heading()?,
            Event::StartFigureCaption { properties } => emitter.start_figure_caption(properties)?,
            Event::EndFigureCaption => emitter.end_figure_caption()?,
            Event::StartTableCaption { properties } => emitter.start_table_caption(properties)?,
            Event::EndTableCaption => emitter.end_table_caption()?,
            Event::Reference { target, label } => {
                emitter.handle_reference(&target, label.as_deref())
            }
            Event::Image {
                reference,
                label,
                width,
                height,
            } => emitter.handle_image(&reference, label.as_deref(), width, height),
            Event::StartTable { properties } => emitter.start_table(properties)?,
            Event::EndTable => emitter.end_table()?,
            Event::StartTableRow => emitter.start_table_row()?,
            Event::EndTableRow => emitter.end_table_row()?,
            Event::StartTableCell => emitter.start_table_cell()?,
            Event::EndTableCell => emitter.end_table_cell()?,
        }
        Ok(())
    }
}

/// Parse a JSON array of events
pub fn parse_events(json: &str) -> Result<Vec<Event>> {
    Ok(serde_json::from_str(json)?)
}

/// Replay events in order, stopping at the first structural error
pub fn replay(
    emitter: &mut DocxEmitter<'_>,
    events: impl IntoIterator<Item = Event>,
) -> Result<()> {
    for event in events {
        event.apply(emitter)?;
    }
    Ok(())
}
