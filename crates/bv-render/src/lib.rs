//! HTML page generator for the bug-detail view.
//!
//! Turns the current state of a bug-detail view into a standalone HTML page.
//!
//! # Features
//!
//! - **Single-file output**: pages are standalone HTML with a CDN-loaded stylesheet
//! - **State-driven**: loading, error and loaded pages are rendered from a [`PageModel`]
//! - **Lightbox**: an inline script, or plain links when pages are served by `bv-core serve`
//! - **Image fallback**: every image swaps in the placeholder when it fails to load
//! - **Markdown**: bug bodies are rendered with pulldown-cmark, raw HTML escaped
//!
//! # Sections
//!
//! - Header: back control, title and long-form date
//! - Screenshots: clickable gallery grid
//! - Body: markdown content, plain description or a fallback
//! - Contributors: photo, name and optional LinkedIn link
//! - Overlay: enlarged image with a close control
//!
//! # Example
//!
//! ```no_run
//! use bv_common::{parse_bug_list, BugId, BugSnapshot};
//! use bv_render::{PageGenerator, PageModel, RenderConfig};
//!
//! let list = parse_bug_list(r#"[{"id":"1","title":"Login crash"}]"#).unwrap();
//! let record = list.find(&BugId::new("1")).unwrap().unwrap();
//! let snapshot = BugSnapshot::normalize(record).unwrap();
//! let generator = PageGenerator::new(RenderConfig::default());
//! let page = generator
//!     .render(&PageModel::Ready { snapshot: &snapshot, overlay: None })
//!     .unwrap();
//! assert!(page.html.contains("Login crash"));
//! ```

pub mod config;
pub mod error;
pub mod escape;
pub mod generator;
pub mod markdown;
pub mod probe;
pub mod sections;

pub use config::{CdnLibrary, InteractionMode, PageTheme, RenderConfig};
pub use error::{RenderError, Result};
pub use generator::{AssetFailure, PageGenerator, PageModel, RenderedPage};
pub use probe::{AssetProbe, DirProbe};
