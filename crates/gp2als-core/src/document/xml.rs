//! Reading and writing [`Document`]s with quick-xml.
//!
//! Whitespace-only text inside elements that have children is dropped on
//! read; the writer re-indents with two spaces. Leaf elements keep their
//! text as is. Comments, processing instructions and the doctype are not
//! kept.

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::io::Write;

use super::{Document, NodeId};
use crate::error::{Error, Result};

impl Document {
    /// Parse an XML document from a string.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut doc: Option<Self> = None;
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let id = open_element(&mut doc, &stack, e)?;
                    stack.push(id);
                }
                Event::Empty(ref e) => {
                    open_element(&mut doc, &stack, e)?;
                }
                Event::End(_) => {
                    if let (Some(doc), Some(closed)) = (doc.as_mut(), stack.pop()) {
                        doc.drop_indentation(closed);
                    }
                }
                Event::Text(ref e) => {
                    let text = e.unescape()?;
                    if let (Some(doc), Some(&current)) = (doc.as_mut(), stack.last()) {
                        let indentation = text.trim().is_empty();
                        if !(indentation && !doc[current].children().is_empty()) {
                            doc.push_text(current, &text);
                        }
                    }
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|err| Error::Xml(format!("invalid UTF-8 in CDATA: {err}")))?;
                    if let (Some(doc), Some(&current)) = (doc.as_mut(), stack.last()) {
                        doc.push_text(current, text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml(String::from("unexpected end of document")));
        }
        doc.ok_or_else(|| Error::Xml(String::from("document has no root element")))
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_element(&mut writer, self.root)?;
        writer
            .get_mut()
            .write_all(b"\n")
            .map_err(|err| Error::Xml(err.to_string()))?;
        Ok(())
    }

    /// Serialize into an in-memory buffer.
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Whitespace collected before the first child of a parent element is
    /// indentation, not content.
    fn drop_indentation(&mut self, id: NodeId) {
        let element = &mut self.nodes[id.index()];
        let blank = element.text.as_deref().is_some_and(|t| t.trim().is_empty());
        if blank && !element.children.is_empty() {
            element.text = None;
        }
    }

    fn write_element<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        let element = &self[id];
        let mut start = BytesStart::new(element.name());
        for (key, value) in element.attributes() {
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: Cow::Owned(escape_attribute(value).into_bytes()),
            });
        }

        if element.children().is_empty() && element.text().is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = element.text() {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for &child in element.children() {
            self.write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.name())))?;
        Ok(())
    }
}

/// Escape an attribute value. Tabs and line breaks are written as
/// character references so readers do not normalize them to spaces.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in escape(value).chars() {
        match ch {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Create the element described by `start` under the innermost open
/// element, or as the root when nothing is open yet.
fn open_element(
    doc: &mut Option<Document>,
    stack: &[NodeId],
    start: &BytesStart<'_>,
) -> Result<NodeId> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| Error::Xml(format!("invalid UTF-8 in element name: {err}")))?
        .to_string();

    let (target, id) = if let Some(&parent) = stack.last() {
        let target = doc
            .as_mut()
            .ok_or_else(|| Error::Xml(format!("element <{name}> outside of the root")))?;
        let id = target.append_child(parent, name);
        (target, id)
    } else if doc.is_some() {
        return Err(Error::Xml(format!(
            "unexpected second root element <{name}>"
        )));
    } else {
        let target = doc.insert(Document::new(name));
        let id = target.root();
        (target, id)
    };

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| Error::Xml(format!("invalid UTF-8 in attribute name: {err}")))?
            .to_string();
        let value = attr.unescape_value()?;
        target.nodes[id.index()]
            .attributes
            .push((key, value.into_owned()));
    }

    Ok(id)
}
