//! XML reader: bytes → [`Element`] tree.
//!
//! Text and CDATA inside an element are concatenated into
//! [`Element::text`]. Leaf text is kept verbatim, padding included; text of
//! an element with children is trimmed so indentation never leaks in.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;
use std::str;

use cfgx_core::{ConfigError, ConfigResult};

use super::element::Element;

/// Parse a complete document held in memory.
pub fn parse_document(xml_content: &str) -> ConfigResult<Element> {
    let mut reader = Reader::from_str(xml_content);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(start_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(close(element), &mut stack, &mut root)?;
                }
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| ConfigError::Xml(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(t)) => {
                let raw = t.into_inner();
                let text = str::from_utf8(&raw)
                    .map_err(|_| ConfigError::Xml("Invalid UTF-8 in CDATA section".into()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConfigError::Xml(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConfigError::Xml(format!("Unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| ConfigError::Xml("Document has no root element".into()))
}

/// Read `reader` to the end and parse it.
pub fn parse_reader<R: Read>(mut reader: R) -> ConfigResult<Element> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_document(&content)
}

fn start_element(e: &BytesStart) -> ConfigResult<Element> {
    let name_bytes = e.name();
    let tag_name = str::from_utf8(name_bytes.as_ref())
        .map_err(|_| ConfigError::Xml("Invalid UTF-8 in tag name".into()))?;

    let mut element = Element::new(tag_name);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ConfigError::Xml(e.to_string()))?;
        let key = str::from_utf8(attr.key.as_ref())
            .map_err(|_| ConfigError::Xml("Invalid UTF-8 in attribute name".into()))?;
        let val = attr
            .unescape_value()
            .map_err(|e| ConfigError::Xml(e.to_string()))?;
        element.attributes.push((key.to_string(), val.to_string()));
    }
    Ok(element)
}

fn close(mut element: Element) -> Element {
    if !element.children.is_empty() {
        let trimmed = element.text.trim();
        if trimmed.len() != element.text.len() {
            element.text = trimmed.to_string();
        }
    }
    element
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> ConfigResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ConfigError::Xml(format!(
            "Multiple root elements; unexpected <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}
