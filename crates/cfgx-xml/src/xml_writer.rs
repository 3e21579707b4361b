//! XML writer: [`Element`] tree → bytes.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};

use cfgx_core::{ConfigError, ConfigResult};

use super::element::Element;

/// Serialize `root` (with an XML declaration) into `out`.
///
/// `indent` is the number of spaces per nesting level; 0 writes everything
/// on one line.
pub fn write_document<W: Write>(root: &Element, out: W, indent: usize) -> ConfigResult<()> {
    if indent == 0 {
        write_with(&mut Writer::new(out), root)
    } else {
        write_with(&mut Writer::new_with_indent(out, b' ', indent), root)
    }
}

/// Serialize `root` into a UTF-8 string.
pub fn write_to_string(root: &Element, indent: usize) -> ConfigResult<String> {
    let mut buf = Cursor::new(Vec::new());
    write_document(root, &mut buf, indent)?;
    String::from_utf8(buf.into_inner()).map_err(|e| ConfigError::Xml(e.to_string()))
}

fn write_with<W: Write>(writer: &mut Writer<W>, root: &Element) -> ConfigResult<()> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| ConfigError::Xml(e.to_string()))?;
    write_element(writer, root)?;
    writer
        .get_mut()
        .flush()
        .map_err(ConfigError::Io)
}

/// Write a single element (recursive for children).
fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> ConfigResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| ConfigError::Xml(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| ConfigError::Xml(e.to_string()))?;

    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| ConfigError::Xml(e.to_string()))?;
    }

    for child in &element.children {
        write_element(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| ConfigError::Xml(e.to_string()))?;

    Ok(())
}
