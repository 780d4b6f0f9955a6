use crate::color::ColorResolver;
use crate::document::{Document, NodeId, Viewport, renderable_paths};
use crate::error::{ColorFormatError, PathCommandError, Result};
use crate::geometry::bounds::{Bounds, BoundsAccumulator};
use crate::group::ColorGroups;
use crate::interpreter::{Emitter, interpret};
use crate::options::ExtractOptions;
use crate::segment::Subpath;
use crate::shape::Shape;
use crate::tokenizer::tokenize;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub shapes: Vec<Shape>,
    pub groups: ColorGroups,
    pub bounds: Bounds,
    pub viewport: Viewport,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    pub fn shape(&self, source_index: usize) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.source_index == source_index)
    }
}

/// A recovered problem with one path element.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub source_index: usize,
    pub issue: Issue,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Issue {
    #[error(transparent)]
    Path(#[from] PathCommandError),
    #[error(transparent)]
    Color(#[from] ColorFormatError),
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let kind = match self.issue {
            Issue::Path(_) => "path",
            Issue::Color(_) => "color",
        };
        let mut s = serializer.serialize_struct("Diagnostic", 3)?;
        s.serialize_field("source_index", &self.source_index)?;
        s.serialize_field("kind", kind)?;
        s.serialize_field("message", &self.issue.to_string())?;
        s.end()
    }
}

/// Parse `svg` and extract every rendered path element.
///
/// Fails only when the document itself cannot be read; problems with single
/// elements end up in [`Extraction::diagnostics`].
pub fn extract(svg: &str, options: &ExtractOptions) -> Result<Extraction> {
    let doc = Document::parse(svg)?;
    Ok(extract_document(&doc, options))
}

pub fn extract_document(doc: &Document, options: &ExtractOptions) -> Extraction {
    let resolver = ColorResolver::new(options.fill_default);
    let mut shapes = Vec::new();
    let mut diagnostics = Vec::new();
    let mut bounds = BoundsAccumulator::new();

    for (source_index, node) in renderable_paths(doc) {
        let Some(data) = doc.attribute(node, "d") else {
            tracing::debug!(source_index, "path has no data, skipping");
            continue;
        };

        let (subpaths, element_bounds) = match interpret_data(data, options) {
            Ok(Some(out)) => out,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(source_index, %err, "skipping path element");
                diagnostics.push(Diagnostic {
                    source_index,
                    issue: err.into(),
                });
                continue;
            }
        };
        bounds.merge(&element_bounds);

        let mut color_issues = Vec::new();
        let color = resolver.resolve(doc, node, &mut color_issues);
        diagnostics.extend(color_issues.into_iter().map(|err| Diagnostic {
            source_index,
            issue: err.into(),
        }));

        tracing::debug!(
            source_index,
            subpaths = subpaths.len(),
            color = %color.key,
            "interpreted path element"
        );
        shapes.push(Shape {
            source_index,
            element_id: element_id(doc, node),
            color: color.key,
            color_source: color.source,
            subpaths,
        });
    }

    let groups = ColorGroups::from_shapes(&shapes);
    let viewport = doc.viewport(options.fallback_size);
    let bounds = bounds.finish(viewport.width, viewport.height);
    tracing::debug!(
        shapes = shapes.len(),
        groups = groups.len(),
        skipped = diagnostics.len(),
        ?bounds,
        "extraction finished"
    );

    Extraction {
        shapes,
        groups,
        bounds,
        viewport,
        diagnostics,
    }
}

/// Interpret one `d` attribute. `Ok(None)` for data with no commands at all.
fn interpret_data(
    data: &str,
    options: &ExtractOptions,
) -> std::result::Result<Option<(Vec<Subpath>, BoundsAccumulator)>, PathCommandError> {
    let commands = tokenize(data)?;
    if commands.is_empty() {
        return Ok(None);
    }
    let mut emitter = Emitter::new(options.samples(), options.max_segments_per_path);
    interpret(&commands, &mut emitter)?;
    Ok(Some(emitter.finish()))
}

fn element_id(doc: &Document, node: NodeId) -> Option<String> {
    doc.attribute(node, "id").map(str::to_string)
}
