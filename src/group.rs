//! Partition of shapes by fill colour.

use crate::color::normalize;
use crate::error::ColorFormatError;
use crate::shape::Shape;
use indexmap::IndexMap;
use serde::Serialize;

pub const DEFAULT_DEPTH: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorGroup {
    pub key: String,
    /// Colour as resolved from the document. Never changes.
    pub original: String,
    /// Colour currently applied by an editor; starts equal to `original`.
    pub current: String,
    /// Extrusion depth applied to every member.
    pub depth: f32,
    /// `source_index` of each member shape, in document order.
    pub members: Vec<usize>,
}

impl ColorGroup {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            original: key.to_string(),
            current: key.to_string(),
            depth: DEFAULT_DEPTH,
            members: Vec::new(),
        }
    }

    pub fn set_color(&mut self, value: &str) -> Result<(), ColorFormatError> {
        match normalize(value)? {
            Some(key) => {
                self.current = key;
                Ok(())
            }
            None => Err(ColorFormatError {
                value: value.to_string(),
            }),
        }
    }

    pub fn reset_color(&mut self) {
        self.current = self.original.clone();
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }
}

/// Groups keyed by colour, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct ColorGroups(IndexMap<String, ColorGroup>);

impl ColorGroups {
    pub fn from_shapes(shapes: &[Shape]) -> Self {
        let mut groups = ColorGroups::default();
        for shape in shapes {
            groups.insert(&shape.color, shape.source_index);
        }
        groups
    }

    pub fn insert(&mut self, key: &str, source_index: usize) {
        if !self.0.contains_key(key) {
            self.0.insert(key.to_string(), ColorGroup::new(key));
        }
        if let Some(group) = self.0.get_mut(key) {
            group.members.push(source_index);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ColorGroup> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ColorGroup> {
        self.0.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorGroup> {
        self.0.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ColorGroups {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSource;

    fn shape(source_index: usize, color: &str) -> Shape {
        Shape {
            source_index,
            element_id: None,
            color: color.to_string(),
            color_source: ColorSource::Attribute,
            subpaths: Vec::new(),
        }
    }

    #[test]
    fn first_seen_order_and_member_order() {
        let shapes = vec![
            shape(0, "#ff0000"),
            shape(1, "#00ff00"),
            shape(3, "#ff0000"),
            shape(4, "#0000ff"),
            shape(5, "#00ff00"),
        ];
        let groups = ColorGroups::from_shapes(&shapes);
        let keys: Vec<_> = groups.keys().collect();
        assert_eq!(keys, vec!["#ff0000", "#00ff00", "#0000ff"]);
        assert_eq!(groups.get("#ff0000").unwrap().members, vec![0, 3]);
        assert_eq!(groups.get("#00ff00").unwrap().members, vec![1, 5]);
    }

    #[test]
    fn editing_state() {
        let mut groups = ColorGroups::from_shapes(&[shape(0, "#123456")]);
        let group = groups.get_mut("#123456").unwrap();
        assert_eq!(group.current, group.original);
        assert_eq!(group.depth, DEFAULT_DEPTH);

        group.set_color("RGB(255, 255, 0)").unwrap();
        assert_eq!(group.current, "#ffff00");
        assert!(group.set_color("none").is_err());
        assert!(group.set_color("nope").is_err());
        assert_eq!(group.current, "#ffff00");

        group.reset_color();
        assert_eq!(group.current, "#123456");
        group.set_depth(2.5);
        assert_eq!(group.depth, 2.5);
        assert_eq!(group.key, "#123456");
    }

    #[test]
    fn serializes_as_ordered_list() {
        let groups = ColorGroups::from_shapes(&[shape(0, "#bbbbbb"), shape(1, "#aaaaaa")]);
        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(json[0]["key"], "#bbbbbb");
        assert_eq!(json[1]["members"][0], 1);
    }
}
