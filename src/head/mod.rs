//! Document head abstraction.
//!
//! # Module Structure
//!
//! ```text
//! head/
//! ├── mod.rs       # Head trait, Selector, ElementId, HeadError (this file)
//! ├── document.rs  # HeadDocument: in-memory Head
//! ├── parse.rs     # HTML -> HeadDocument (tl)
//! └── render.rs    # HeadDocument -> HTML, splice into a full page
//! ```
//!
//! The synchronizer only talks to [`Head`]. A host (an in-memory document,
//! a browser binding, a server-side renderer) supplies the implementation.

mod document;
mod parse;
mod render;

pub use document::{Content, HeadDocument, HeadElement, HeadNode};
pub use parse::{HeadSpan, ParseError, find_head, parse_document, parse_head};
pub use render::{render_head, splice_head};

use std::fmt;
use thiserror::Error;

/// Opaque handle to an element owned by a [`Head`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

/// Errors raised by head operations.
#[derive(Debug, Error)]
pub enum HeadError {
    #[error("unknown element handle {0:?}")]
    UnknownElement(ElementId),

    #[error("element {0:?} is already attached to the head")]
    AlreadyAttached(ElementId),

    #[error("invalid {kind} name `{name}`")]
    InvalidName { kind: &'static str, name: String },

    #[error("`<{0}>` is a void element and cannot hold text")]
    VoidElement(String),

    #[error("head operation failed: {0}")]
    Host(String),
}

/// Attribute matcher: `tag[attr]` or `tag[attr="value"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    pub tag: &'a str,
    pub attr: &'a str,
    /// `None` matches on attribute presence alone.
    pub value: Option<&'a str>,
}

impl<'a> Selector<'a> {
    /// `tag[attr="value"]`
    pub const fn attr_eq(tag: &'a str, attr: &'a str, value: &'a str) -> Self {
        Self {
            tag,
            attr,
            value: Some(value),
        }
    }

    /// `tag[attr]`
    pub const fn has_attr(tag: &'a str, attr: &'a str) -> Self {
        Self {
            tag,
            attr,
            value: None,
        }
    }

    /// Test an element's tag and attributes against this selector.
    pub fn matches(&self, element: &HeadElement) -> bool {
        element.tag.eq_ignore_ascii_case(self.tag)
            && match (element.attr(self.attr), self.value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}[{}=\"{}\"]", self.tag, self.attr, value),
            None => write!(f, "{}[{}]", self.tag, self.attr),
        }
    }
}

/// Mutable access to a document head.
///
/// Mirrors the handful of DOM operations head synchronization needs.
/// Implementations are single-writer; nothing here is synchronized.
pub trait Head {
    /// Set the document title (the head's `<title>` element).
    fn set_title(&mut self, title: &str) -> Result<(), HeadError>;

    /// First attached element matching `selector`, in document order.
    fn query(&self, selector: &Selector<'_>) -> Result<Option<ElementId>, HeadError>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<ElementId, HeadError>;

    /// Append a detached element as the last child of the head.
    fn append_child(&mut self, id: ElementId) -> Result<(), HeadError>;

    fn set_attribute(&mut self, id: ElementId, name: &str, value: &str)
    -> Result<(), HeadError>;

    /// Replace the element's content with `text`.
    fn set_text_content(&mut self, id: ElementId, text: &str) -> Result<(), HeadError>;
}

impl<H: Head + ?Sized> Head for &mut H {
    fn set_title(&mut self, title: &str) -> Result<(), HeadError> {
        (**self).set_title(title)
    }

    fn query(&self, selector: &Selector<'_>) -> Result<Option<ElementId>, HeadError> {
        (**self).query(selector)
    }

    fn create_element(&mut self, tag: &str) -> Result<ElementId, HeadError> {
        (**self).create_element(tag)
    }

    fn append_child(&mut self, id: ElementId) -> Result<(), HeadError> {
        (**self).append_child(id)
    }

    fn set_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        value: &str,
    ) -> Result<(), HeadError> {
        (**self).set_attribute(id, name, value)
    }

    fn set_text_content(&mut self, id: ElementId, text: &str) -> Result<(), HeadError> {
        (**self).set_text_content(id, text)
    }
}

/// Tag and attribute names: ASCII letters, digits, `-`, `_`, `:`, `.`,
/// starting with a letter.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}
