//! Minimal element tree for an SVG document.
//!
//! Elements live in a flat arena in document order; each node keeps its
//! parent as an index so ancestor walks never need owning back-pointers.

use crate::error::{DocumentError, Result};
use serde::Serialize;
use std::str::FromStr;
use svgtypes::LengthUnit;

pub type NodeId = usize;

/// Tag of the non-rendered definitions container.
pub const DEFS_TAG: &str = "defs";

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self> {
        let opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, opt)?;
        let root = xml.root_element();
        if root.tag_name().name() != "svg" {
            return Err(DocumentError::MissingRoot {
                found: root.tag_name().name().to_string(),
            });
        }

        let mut doc = Document { nodes: Vec::new() };
        doc.push_element(root, None);
        Ok(doc)
    }

    fn push_element(&mut self, element: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: element.tag_name().name().to_string(),
            attributes: element
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            parent,
            children: Vec::new(),
        });
        for child in element.children().filter(|c| c.is_element()) {
            let child_id = self.push_element(child, Some(id));
            self.nodes[id].children.push(child_id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id].attribute(name)
    }

    /// Ancestors of `id`, nearest first. Does not include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, move |&p| self.nodes[p].parent)
    }

    /// Elements with the given tag, in document order.
    pub fn elements(&self, tag: &'static str) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(move |&id| self.nodes[id].tag == tag)
    }

    pub fn viewport(&self, fallback: (f32, f32)) -> Viewport {
        let root = self.root();
        let view_box = self.attribute(root, "viewBox").and_then(parse_view_box);
        let (x, y) = view_box.map_or((0.0, 0.0), |vb| (vb[0], vb[1]));
        let width = view_box
            .map(|vb| vb[2])
            .filter(|w| *w != 0.0)
            .or_else(|| self.attribute(root, "width").and_then(parse_length))
            .unwrap_or(fallback.0);
        let height = view_box
            .map(|vb| vb[3])
            .filter(|h| *h != 0.0)
            .or_else(|| self.attribute(root, "height").and_then(parse_length))
            .unwrap_or(fallback.1);
        Viewport {
            x,
            y,
            width,
            height,
        }
    }
}

/// Whether `id` sits somewhere under a definitions container.
pub fn has_defs_ancestor(doc: &Document, id: NodeId) -> bool {
    doc.ancestors(id).any(|a| doc.node(a).tag == DEFS_TAG)
}

/// Every `path` element in document order, paired with its position among
/// all path elements, with those under a definitions container removed.
pub fn renderable_paths(doc: &Document) -> Vec<(usize, NodeId)> {
    doc.elements("path")
        .enumerate()
        .filter(|&(_, id)| !has_defs_ancestor(doc, id))
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

fn parse_view_box(text: &str) -> Option<[f32; 4]> {
    let vb = svgtypes::ViewBox::from_str(text).ok()?;
    Some([vb.x as f32, vb.y as f32, vb.w as f32, vb.h as f32])
}

/// A plain or `px` length such as `120` or `120px`. Other units and
/// percentages have no fixed size here and are rejected.
fn parse_length(text: &str) -> Option<f32> {
    let length = svgtypes::Length::from_str(text.trim()).ok()?;
    match length.unit {
        LengthUnit::None | LengthUnit::Px => Some(length.number as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32">
        <defs><g><path id="hidden" d="M0 0 L1 1"/></g></defs>
        <g fill="red"><path id="a" d="M0 0 L2 2"/></g>
        <path id="b" d="M1 1 L3 3"/>
    </svg>"##;

    #[test]
    fn builds_arena_in_document_order() {
        let doc = Document::parse(NESTED).unwrap();
        let ids: Vec<_> = doc
            .elements("path")
            .map(|id| doc.attribute(id, "id").unwrap())
            .collect();
        assert_eq!(ids, vec!["hidden", "a", "b"]);
        assert_eq!(doc.node(doc.root()).children.len(), 3);
    }

    #[test]
    fn ancestors_walk_upwards() {
        let doc = Document::parse(NESTED).unwrap();
        let hidden = doc.elements("path").next().unwrap();
        let tags: Vec<_> = doc
            .ancestors(hidden)
            .map(|id| doc.node(id).tag.as_str())
            .collect();
        assert_eq!(tags, vec!["g", "defs", "svg"]);
    }

    #[test]
    fn defs_subtree_is_filtered() {
        let doc = Document::parse(NESTED).unwrap();
        let paths = renderable_paths(&doc);
        let indices: Vec<_> = paths.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn rejects_non_svg_root() {
        assert!(matches!(
            Document::parse("<html><path d='M0 0'/></html>"),
            Err(DocumentError::MissingRoot { found }) if found == "html"
        ));
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(matches!(
            Document::parse("<svg><path></svg>"),
            Err(DocumentError::Xml(_))
        ));
    }

    #[test]
    fn accepts_doctype() {
        let text = r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg width="10" height="10"/>"#;
        assert!(Document::parse(text).is_ok());
    }

    #[test]
    fn viewport_prefers_view_box() {
        let doc = Document::parse(r#"<svg viewBox="5,5 200 150" width="10" height="10"/>"#).unwrap();
        assert_eq!(
            doc.viewport((100.0, 100.0)),
            Viewport {
                x: 5.0,
                y: 5.0,
                width: 200.0,
                height: 150.0
            }
        );
    }

    #[test]
    fn viewport_from_lengths_and_fallback() {
        let doc = Document::parse(r#"<svg width="120px" height="auto"/>"#).unwrap();
        let vp = doc.viewport((100.0, 100.0));
        assert_eq!((vp.width, vp.height), (120.0, 100.0));
    }

    #[test]
    fn malformed_or_relative_lengths_use_fallback() {
        let doc = Document::parse(r#"<svg width="1.2.3px" height="50%"/>"#).unwrap();
        let vp = doc.viewport((64.0, 48.0));
        assert_eq!((vp.width, vp.height), (64.0, 48.0));

        let doc = Document::parse(r#"<svg width=" 42 " height="7.5"/>"#).unwrap();
        let vp = doc.viewport((64.0, 48.0));
        assert_eq!((vp.width, vp.height), (42.0, 7.5));
    }

    #[test]
    fn malformed_view_box_is_ignored() {
        let doc = Document::parse(r#"<svg viewBox="0 0 abc 10" width="30" height="20"/>"#).unwrap();
        let vp = doc.viewport((100.0, 100.0));
        assert_eq!((vp.x, vp.y, vp.width, vp.height), (0.0, 0.0, 30.0, 20.0));
    }
}
