//! # docxflow-ooxml
//!
//! Event-driven emission of WordprocessingML body markup.
//!
//! This crate provides functionality to:
//! - Turn a stream of rich-text events into a `w:body` fragment
//! - Allocate list numbering, hyperlink and image relationships per document
//! - Embed images from data URLs or remote URLs as inline drawings
//!
//! ## Example: Emitting a Fragment
//!
//! ```
//! use docxflow_ooxml::{EmitterConfig, RenderSession};
//!
//! let mut session = RenderSession::offline(EmitterConfig::default());
//! let mut emitter = session.emitter();
//!
//! emitter.start_document();
//! emitter.start_heading(1, None)?;
//! emitter.handle_string("Report");
//! emitter.end_heading()?;
//! emitter.start_unordered_list(None);
//! emitter.start_list_item(None)?;
//! emitter.handle_string("first");
//! emitter.end_list_item();
//! emitter.end_unordered_list()?;
//! emitter.end_document()?;
//!
//! let fragment = emitter.finish()?;
//! assert!(fragment.markup.contains("<w:pStyle w:val=\"Heading1\"/>"));
//! assert!(session.numbering_xml().contains("<w:num w:numId=\"1\">"));
//! # Ok::<(), docxflow_ooxml::OoxmlError>(())
//! ```

pub mod blocks;
pub mod config;
pub mod data_url;
pub mod emitter;
pub mod error;
pub mod events;
pub mod fetch;
pub mod formatting;
pub mod hyperlinks;
pub mod image;
pub mod list;
pub mod numbering;
pub mod properties;
pub mod relationships;
pub mod session;
pub mod sink;
pub mod styles;
pub mod xml;

pub use config::{EmitterConfig, StyleConfig};
pub use data_url::{parse_data_url, DataUrl};
pub use emitter::{DocxEmitter, EmitWarning, Fragment};
pub use error::{DataUrlError, OoxmlError, Result};
pub use events::{parse_events, replay, Event};
#[cfg(feature = "fetch")]
pub use fetch::HttpImageFetcher;
pub use fetch::ImageFetcher;
pub use hyperlinks::HyperlinkRegistry;
pub use image::{ImageInfo, ImageProvider, ImageRegistry, MediaPart};
pub use numbering::{NumDefinition, NumberingRegistry};
pub use properties::{
    ContainerProperties, RunProperties, SpanProperties, TableProperties, TextAlignment, Toggle,
};
pub use relationships::Relationships;
pub use session::RenderSession;
pub use styles::{ElementType, StyleGenerator, StyleMap};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
