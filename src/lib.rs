//! Extract fill-grouped polygonal shapes from SVG `path` elements.
//!
//! ```
//! use svg_extrude::{ExtractOptions, extract};
//!
//! let svg = r##"<svg width="10" height="10">
//!     <path fill="#FF0000" d="M0 0 L10 0 L10 10 Z"/>
//!     <path fill="rgb(255, 0, 0)" d="M2 2 l2 0 l0 2 z"/>
//! </svg>"##;
//! let out = extract(svg, &ExtractOptions::default()).unwrap();
//! assert_eq!(out.shapes.len(), 2);
//! assert_eq!(out.groups.len(), 1);
//! assert_eq!(out.bounds.to_ltrb(), [0.0, 0.0, 10.0, 10.0]);
//! ```

pub mod color;
pub mod document;
pub mod error;
pub mod geometry;
pub mod group;
pub mod interpreter;
pub mod options;
pub mod pipeline;
pub mod segment;
pub mod shape;
pub mod tokenizer;

pub use error::{ColorFormatError, DocumentError, PathCommandError, Result};
pub use geometry::bounds::Bounds;
pub use group::{ColorGroup, ColorGroups};
pub use options::{ExtractOptions, FillDefault};
pub use pipeline::{Diagnostic, Extraction, Issue, extract, extract_document};
pub use segment::{Segment, Subpath};
pub use shape::Shape;
