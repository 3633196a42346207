//! docxflow CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docxflow:
//! - Render: replay a JSON event script into a WordprocessingML fragment
//!
//! # Library Usage
//!
//! ```no_run
//! use std::path::PathBuf;
//! use docxflow_cli::{render_command, RenderOptions};
//!
//! let summary = render_command(&RenderOptions {
//!     input: PathBuf::from("events.json"),
//!     output: Some(PathBuf::from("body.xml")),
//!     offline: true,
//!     ..RenderOptions::default()
//! })?;
//! println!("{} images skipped", summary.skipped_images);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Fragment to stdout
//! docxflow render events.json
//!
//! # Fragment plus the numbering, relationships and media to merge into a package
//! docxflow render events.json -o body.xml --numbering num.xml --rels document.xml.rels --media-dir media/
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{render_command, run_cli, RenderOptions, RenderSummary};
