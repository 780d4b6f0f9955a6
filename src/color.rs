//! Fill colour resolution.
//!
//! Precedence, first match wins: a `fill:` declaration in the element's
//! `style`, the element's `fill` attribute, the nearest ancestor's `fill`
//! attribute, then the configured default. `none` and unparsable values do
//! not match and resolution moves on to the next level.

use crate::document::{Document, NodeId};
use crate::error::ColorFormatError;
use crate::options::FillDefault;
use serde::Serialize;
use std::str::FromStr;

/// Where a resolved colour came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum ColorSource {
    Style,
    Attribute,
    Ancestor(NodeId),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColor {
    /// Lower-case `#rrggbb`.
    pub key: String,
    pub source: ColorSource,
}

#[derive(Debug, Clone)]
pub struct ColorResolver {
    fill_default: FillDefault,
}

impl ColorResolver {
    pub fn new(fill_default: FillDefault) -> Self {
        Self { fill_default }
    }

    /// Resolve the fill of `node`. Rejected values are appended to `issues`.
    pub fn resolve(
        &self,
        doc: &Document,
        node: NodeId,
        issues: &mut Vec<ColorFormatError>,
    ) -> ResolvedColor {
        let element = doc.node(node);
        let own = element
            .attribute("style")
            .and_then(style_fill)
            .map(|v| (v, ColorSource::Style))
            .into_iter()
            .chain(element.attribute("fill").map(|v| (v, ColorSource::Attribute)));
        let inherited = doc.ancestors(node).filter_map(|a| {
            doc.attribute(a, "fill")
                .map(|v| (v, ColorSource::Ancestor(a)))
        });

        for (value, source) in own.chain(inherited) {
            match normalize(value) {
                Ok(Some(key)) => return ResolvedColor { key, source },
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(node, value, "ignoring unrecognised fill value");
                    issues.push(err);
                }
            }
        }

        ResolvedColor {
            key: self.fill_default.key().to_string(),
            source: ColorSource::Default,
        }
    }
}

/// Value of the `fill` declaration in an inline style, if any.
pub fn style_fill(style: &str) -> Option<&str> {
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("fill") {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map(str::trim_end)
            .unwrap_or(value);
        Some(value)
    })
}

/// Normalise a colour value to a lower-case `#rrggbb` key.
///
/// `Ok(None)` means the value explicitly paints nothing (`none`, or empty).
pub fn normalize(value: &str) -> Result<Option<String>, ColorFormatError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let rgb = if let Some(hex) = value.strip_prefix('#') {
        parse_hex(hex)
    } else {
        parse_rgb_function(value)
    };

    rgb.or_else(|| {
        svgtypes::Color::from_str(value)
            .ok()
            .map(|c| [c.red, c.green, c.blue])
    })
    .map(|rgb| Some(to_hex(rgb)))
    .ok_or_else(|| ColorFormatError {
        value: value.to_string(),
    })
}

pub fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ]),
        3 => Some([
            u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?,
            u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?,
            u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?,
        ]),
        _ => None,
    }
}

/// `rgb(r, g, b)` with integer channels in 0..=255.
fn parse_rgb_function(value: &str) -> Option<[u8; 3]> {
    let lower = value.to_ascii_lowercase();
    let inner = lower.strip_prefix("rgb(")?.strip_suffix(')')?;
    let channels: Vec<u8> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match channels.as_slice() {
        [r, g, b] => Some([*r, *g, *b]),
        _ => None,
    }
}
