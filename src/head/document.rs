//! In-memory document head.

use std::borrow::Cow;

use super::{ElementId, Head, HeadError, Selector, is_valid_name};
use crate::utils::html::{is_raw_text_element, is_void_element, unescape};

/// Element content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    /// Plain text, escaped on render.
    Text(String),
    /// Markup carried over verbatim from parsed input.
    Raw(String),
}

/// A single head element: tag, ordered attributes, content.
///
/// Parsed elements keep their original markup in `source` until they are
/// modified; the renderer writes an unmodified element back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadElement {
    pub tag: String,
    attrs: Vec<(String, String)>,
    content: Content,
    source: Option<String>,
}

impl HeadElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            content: Content::Empty,
            source: None,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn set_content(&mut self, content: Content) {
        self.content = content;
        self.source = None;
    }

    /// Original markup, present while the element is unmodified.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    /// Attribute value (names compare case-insensitively, as in HTML).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.source = None;
        match self
            .attrs
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Text content with entities decoded (raw-text elements are as-is).
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match &self.content {
            Content::Empty => None,
            Content::Text(s) => Some(Cow::Borrowed(s)),
            Content::Raw(s) if is_raw_text_element(&self.tag) => Some(Cow::Borrowed(s)),
            Content::Raw(s) => Some(unescape(s)),
        }
    }
}

/// A child of the head, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadNode {
    Element(ElementId),
    Comment(String),
    /// Non-whitespace stray text between elements, kept as written
    /// (entities are not decoded).
    Text(String),
}

/// Head held in memory, usually parsed from a page and rendered back.
///
/// Elements live in an arena; `children` is the attached, ordered view.
/// Elements are only ever added, never removed.
#[derive(Debug, Clone, Default)]
pub struct HeadDocument {
    arena: Vec<HeadElement>,
    attached: Vec<bool>,
    children: Vec<HeadNode>,
}

impl HeadDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-built element (used when parsing).
    pub fn push_element(&mut self, element: HeadElement) -> ElementId {
        let id = ElementId(self.arena.len());
        self.arena.push(element);
        self.attached.push(true);
        self.children.push(HeadNode::Element(id));
        id
    }

    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(HeadNode::Comment(comment.into()));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(HeadNode::Text(text.into()));
    }

    pub fn children(&self) -> &[HeadNode] {
        &self.children
    }

    pub fn element(&self, id: ElementId) -> Option<&HeadElement> {
        self.arena.get(id.0)
    }

    /// Attached elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &HeadElement)> {
        self.children.iter().filter_map(|node| match node {
            HeadNode::Element(id) => Some((*id, &self.arena[id.0])),
            _ => None,
        })
    }

    /// Number of attached elements.
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// All attached elements matching `selector`.
    pub fn select<'s>(
        &'s self,
        selector: &'s Selector<'s>,
    ) -> impl Iterator<Item = &'s HeadElement> + 's {
        self.elements()
            .map(|(_, element)| element)
            .filter(move |element| selector.matches(element))
    }

    /// First element matching `selector`.
    pub fn find(&self, selector: &Selector<'_>) -> Option<&HeadElement> {
        self.elements()
            .map(|(_, element)| element)
            .find(|element| selector.matches(element))
    }

    /// Current document title.
    pub fn title(&self) -> Option<Cow<'_, str>> {
        self.elements()
            .find(|(_, e)| e.tag == "title")
            .and_then(|(_, e)| e.text())
    }

    /// `content` of the first `meta[name=...]`.
    pub fn meta_name(&self, name: &str) -> Option<&str> {
        self.find(&Selector::attr_eq("meta", "name", name))
            .and_then(|e| e.attr("content"))
    }

    /// `content` of the first `meta[property=...]`.
    pub fn meta_property(&self, property: &str) -> Option<&str> {
        self.find(&Selector::attr_eq("meta", "property", property))
            .and_then(|e| e.attr("content"))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut HeadElement, HeadError> {
        self.arena.get_mut(id.0).ok_or(HeadError::UnknownElement(id))
    }
}

impl Head for HeadDocument {
    fn set_title(&mut self, title: &str) -> Result<(), HeadError> {
        let existing = self
            .elements()
            .find(|(_, e)| e.tag == "title")
            .map(|(id, _)| id);

        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.create_element("title")?;
                self.append_child(id)?;
                id
            }
        };
        self.set_text_content(id, title)
    }

    fn query(&self, selector: &Selector<'_>) -> Result<Option<ElementId>, HeadError> {
        Ok(self
            .elements()
            .find(|(_, element)| selector.matches(element))
            .map(|(id, _)| id))
    }

    fn create_element(&mut self, tag: &str) -> Result<ElementId, HeadError> {
        if !is_valid_name(tag) {
            return Err(HeadError::InvalidName {
                kind: "tag",
                name: tag.to_string(),
            });
        }
        let id = ElementId(self.arena.len());
        self.arena.push(HeadElement::new(tag.to_ascii_lowercase()));
        self.attached.push(false);
        Ok(id)
    }

    fn append_child(&mut self, id: ElementId) -> Result<(), HeadError> {
        match self.attached.get_mut(id.0) {
            None => Err(HeadError::UnknownElement(id)),
            Some(true) => Err(HeadError::AlreadyAttached(id)),
            Some(attached) => {
                *attached = true;
                self.children.push(HeadNode::Element(id));
                Ok(())
            }
        }
    }

    fn set_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        value: &str,
    ) -> Result<(), HeadError> {
        if !is_valid_name(name) {
            return Err(HeadError::InvalidName {
                kind: "attribute",
                name: name.to_string(),
            });
        }
        self.get_mut(id)?.set_attr(name, value);
        Ok(())
    }

    fn set_text_content(&mut self, id: ElementId, text: &str) -> Result<(), HeadError> {
        let element = self.get_mut(id)?;
        if is_void_element(&element.tag) {
            return Err(HeadError::VoidElement(element.tag.clone()));
        }
        element.set_content(Content::Text(text.to_string()));
        Ok(())
    }
}
