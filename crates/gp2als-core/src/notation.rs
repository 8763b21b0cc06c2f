//! Rehearsal mark extraction from Guitar Pro MusicXML exports.
//!
//! Only the first `<part>` is read; Guitar Pro writes the same rehearsal
//! marks into every part.

use roxmltree::{Document as XmlDocument, Node, ParsingOptions};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// A rehearsal mark and the measure it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRecord {
    /// 1-based measure number.
    pub bar: u32,
    /// Text of the rehearsal mark, verbatim.
    pub label: String,
}

impl MarkerRecord {
    #[must_use]
    pub fn new(bar: u32, label: impl Into<String>) -> Self {
        Self {
            bar,
            label: label.into(),
        }
    }
}

impl fmt::Display for MarkerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bar {}: {}", self.bar, self.label)
    }
}

/// Read the MusicXML file at `path` and extract its rehearsal marks.
pub fn extract(path: impl AsRef<Path>) -> Result<Vec<MarkerRecord>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    let xml = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let markers = extract_from_str(&xml)?;
    log::debug!("Found {} rehearsal marks in {}", markers.len(), path.display());
    Ok(markers)
}

/// Extract rehearsal marks from MusicXML text, in measure order and then
/// direction order within each measure.
pub fn extract_from_str(xml: &str) -> Result<Vec<MarkerRecord>> {
    // Guitar Pro exports carry a DOCTYPE; it is never fetched.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = XmlDocument::parse_with_options(xml, options)?;
    let part = child(doc.root_element(), "part").ok_or_else(|| Error::structure("part"))?;

    let mut markers = Vec::new();
    for measure in children(part, "measure") {
        for direction in children(measure, "direction") {
            let Some(rehearsal) =
                child(direction, "direction-type").and_then(|dt| child(dt, "rehearsal"))
            else {
                continue;
            };
            let bar = parse_bar(measure.attribute("number"))?;
            let label = rehearsal.text().unwrap_or_default();
            markers.push(MarkerRecord::new(bar, label));
        }
    }

    Ok(markers)
}

fn parse_bar(number: Option<&str>) -> Result<u32> {
    let value = number.unwrap_or_default();
    match value.trim().parse::<u32>() {
        Ok(bar) if bar > 0 => Ok(bar),
        _ => Err(Error::InvalidBar {
            value: value.to_string(),
        }),
    }
}

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}
