//! In-memory XML element tree.
//!
//! Documents are small, so the mapper works on a whole tree rather than on a
//! pull stream: export builds an [`Element`] then hands it to the writer,
//! import parses the full document first and walks it in dependency order.

use super::element_names::common;

/// One XML element with ordered attributes, child elements and text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// Set `key` only when `value` is `Some`.
    pub fn set_optional_attribute(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(v) = value {
            self.set_attribute(key, v);
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Child with tag `name` whose `Name` attribute equals `value`.
    pub fn child_with_name(&self, name: &str, value: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.name == name && c.attribute(common::NAME) == Some(value))
    }

    /// Walk `(tag, Name)` pairs from this element downwards.
    pub fn find_path(&self, path: &[(&str, &str)]) -> Option<&Element> {
        let mut current = self;
        for (tag, name) in path {
            current = current.child_with_name(tag, name)?;
        }
        Some(current)
    }
}
