//! HTML -> `HeadDocument`.
//!
//! The page is located by byte offsets (`find_head`) and the rest of the
//! page is never touched, which keeps `splice_head` lossless outside the
//! head.
//!
//! Inside the head a byte scanner splits top-level comments, text and
//! elements. `script`/`style` bodies (raw text) and `title`/`textarea`
//! bodies (RCDATA) run to their matching end tag and are never read as
//! markup. Start tags go through `tl` for their attributes. Every element
//! keeps its source slice so that unmodified ones render back unchanged.

use std::ops::Range;

use super::{Content, HeadDocument, HeadElement};
use crate::utils::html::{is_raw_text_element, is_rcdata_element, is_void_element, unescape};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document has no <head> element")]
    NoHead,

    #[error("<head> is never closed")]
    UnclosedHead,

    #[error("failed to parse head markup: {0}")]
    Markup(String),
}

/// Byte offsets of the `<head>` element in a page.
///
/// ```text
/// <head lang="en">  ...inner...  </head>
/// ^open            ^inner_start ^inner_end ^close_end
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadSpan {
    pub open: usize,
    pub inner_start: usize,
    pub inner_end: usize,
    pub close_end: usize,
}

/// Locate the `<head>` element (tag names are matched case-insensitively).
///
/// Comments and text-only element bodies are skipped, so `<!-- <head> -->`
/// or `"</head>"` inside a script never count.
pub fn find_head(html: &str) -> Result<HeadSpan, ParseError> {
    let scan = mask_opaque(html);

    let open = find_tag(&scan, b"<head", 0).ok_or(ParseError::NoHead)?;
    let inner_start = start_tag_end(&scan, open + 5).ok_or(ParseError::UnclosedHead)?;
    let inner_end = find_tag(&scan, b"</head", inner_start).ok_or(ParseError::UnclosedHead)?;
    let close_end = start_tag_end(&scan, inner_end + 6).ok_or(ParseError::UnclosedHead)?;

    Ok(HeadSpan {
        open,
        inner_start,
        inner_end,
        close_end,
    })
}

/// Parse a full page, returning its head and where it sits.
pub fn parse_document(html: &str) -> Result<(HeadDocument, HeadSpan), ParseError> {
    let span = find_head(html)?;
    let head = parse_head(&html[span.inner_start..span.inner_end])?;
    Ok((head, span))
}

/// Parse the inner markup of a `<head>`.
pub fn parse_head(inner: &str) -> Result<HeadDocument, ParseError> {
    // ASCII lowercasing keeps byte offsets identical.
    let lower = inner.to_ascii_lowercase();
    let b = lower.as_bytes();

    let mut doc = HeadDocument::new();
    let mut pos = 0;
    let mut text_start = 0;

    while let Some(lt) = find_byte(b, b'<', pos) {
        if b[lt..].starts_with(b"<!--") {
            let (body_end, end) = comment_bounds(b, lt);
            push_text(&mut doc, &inner[text_start..lt]);
            doc.push_comment(&inner[lt + 4..body_end]);
            pos = end;
            text_start = end;
            continue;
        }

        let Some(name_end) = tag_name_end(b, lt) else {
            pos = lt + 1;
            continue;
        };
        // An unterminated start tag leaves the rest as text.
        let Some(open_end) = start_tag_end(b, name_end) else {
            break;
        };

        let name = &lower[lt + 1..name_end];
        let (body, end) = element_extent(b, name, open_end);

        push_text(&mut doc, &inner[text_start..lt]);
        let element = convert_element(
            name,
            &inner[lt..open_end],
            body.map(|range| &inner[range]),
            &inner[lt..end],
        )?;
        doc.push_element(element);

        pos = end;
        text_start = end;
    }
    push_text(&mut doc, &inner[text_start..]);

    Ok(doc)
}

fn push_text(doc: &mut HeadDocument, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        doc.push_text(text);
    }
}

fn convert_element(
    name: &str,
    start_tag: &str,
    body: Option<&str>,
    source: &str,
) -> Result<HeadElement, ParseError> {
    let mut element = HeadElement::new(name);

    for (key, value) in parse_attributes(start_tag)? {
        element.set_attr(&key, value);
    }
    if let Some(body) = body.filter(|body| !body.is_empty()) {
        element.set_content(Content::Raw(body.to_string()));
    }

    element.set_source(source);
    Ok(element)
}

/// Attributes of a single start tag, in source order, values decoded.
fn parse_attributes(start_tag: &str) -> Result<Vec<(String, String)>, ParseError> {
    let dom = tl::parse(start_tag, tl::ParserOptions::default())
        .map_err(|e| ParseError::Markup(format!("{e:?}")))?;
    let parser = dom.parser();

    let Some(tag) = dom
        .children()
        .first()
        .and_then(|handle| handle.get(parser))
        .and_then(tl::Node::as_tag)
    else {
        return Ok(Vec::new());
    };
    let attributes = tag.attributes();

    // `tl` keeps attributes in a map (with `id`/`class` apart), so the
    // order comes from the tag text.
    let attrs = attribute_names(start_tag)
        .into_iter()
        .filter_map(|key| {
            let value = attributes.get(key)?;
            let value = value
                .map(|v| unescape(&v.as_utf8_str()).into_owned())
                .unwrap_or_default();
            Some((key.to_ascii_lowercase(), value))
        })
        .collect();

    Ok(attrs)
}

/// Attribute names of a start tag, in order. Quoted values are skipped
/// whole, so `content="a=b c"` yields only `content`.
fn attribute_names(start_tag: &str) -> Vec<&str> {
    let b = start_tag.as_bytes();
    let mut names = Vec::new();

    let mut i = 1;
    while i < b.len() && !is_name_end(b[i]) {
        i += 1;
    }

    loop {
        while i < b.len() && (b[i].is_ascii_whitespace() || b[i] == b'/') {
            i += 1;
        }
        if i >= b.len() || b[i] == b'>' {
            break;
        }

        let start = i;
        while i < b.len() && !is_name_end(b[i]) && b[i] != b'=' {
            i += 1;
        }
        if i == start {
            // stray `=`
            i += 1;
            continue;
        }
        names.push(&start_tag[start..i]);

        while i < b.len() && b[i].is_ascii_whitespace() {
            i += 1;
        }
        if b.get(i) == Some(&b'=') {
            i += 1;
            while i < b.len() && b[i].is_ascii_whitespace() {
                i += 1;
            }
            i = skip_value(b, i);
        }
    }

    names
}

fn skip_value(b: &[u8], i: usize) -> usize {
    match b.get(i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => b[i + 1..]
            .iter()
            .position(|&c| c == quote)
            .map_or(b.len(), |p| i + p + 2),
        _ => {
            let mut i = i;
            while i < b.len() && !b[i].is_ascii_whitespace() && b[i] != b'>' {
                i += 1;
            }
            i
        }
    }
}

// ============================================================================
// Byte scanning (on ASCII-lowercased input)
// ============================================================================

/// Body of an element whose content is text only.
#[inline]
fn is_text_only(name: &str) -> bool {
    is_raw_text_element(name) || is_rcdata_element(name)
}

#[inline]
fn is_name_end(c: u8) -> bool {
    c.is_ascii_whitespace() || c == b'/' || c == b'>'
}

#[inline]
fn find_byte(b: &[u8], byte: u8, from: usize) -> Option<usize> {
    b.get(from..)?.iter().position(|&c| c == byte).map(|i| from + i)
}

fn find_bytes(b: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    b.get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| from + i)
}

/// Find `prefix` followed by a tag-name boundary, so `<head` skips `<header`.
fn find_tag(b: &[u8], prefix: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(start) = find_bytes(b, prefix, pos) {
        match b.get(start + prefix.len()) {
            None => return Some(start),
            Some(&c) if is_name_end(c) => return Some(start),
            Some(_) => pos = start + prefix.len(),
        }
    }
    None
}

/// `(body_end, end)` of the comment opening at `lt`; runs to the end of
/// input when unterminated.
fn comment_bounds(b: &[u8], lt: usize) -> (usize, usize) {
    match find_bytes(b, b"-->", lt + 4) {
        Some(close) => (close, close + 3),
        None => (b.len(), b.len()),
    }
}

/// End of the tag name for `<name`, when `lt` opens a start tag.
fn tag_name_end(b: &[u8], lt: usize) -> Option<usize> {
    let start = lt + 1;
    if !b.get(start)?.is_ascii_alphabetic() {
        return None;
    }
    let end = b[start..]
        .iter()
        .position(|&c| !(c.is_ascii_alphanumeric() || matches!(c, b'-' | b'_' | b':')))
        .map_or(b.len(), |i| start + i);

    match b.get(end) {
        None => Some(end),
        Some(&c) if is_name_end(c) => Some(end),
        Some(_) => None,
    }
}

/// Index just past the `>` closing a tag, ignoring `>` in quoted values.
fn start_tag_end(b: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &c) in b.iter().enumerate().skip(from) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == b'"' || c == b'\'' => quote = Some(c),
            None if c == b'>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

fn tag_close_end(b: &[u8], at: usize) -> usize {
    find_byte(b, b'>', at).map_or(b.len(), |i| i + 1)
}

/// Body range and end offset of the element named `name` whose start tag
/// ends at `open_end`.
fn element_extent(b: &[u8], name: &str, open_end: usize) -> (Option<Range<usize>>, usize) {
    let self_closing = open_end >= 2 && b[open_end - 2] == b'/';
    if is_void_element(name) || self_closing {
        return (None, open_end);
    }

    let close_prefix = format!("</{name}");
    if is_text_only(name) {
        return match find_tag(b, close_prefix.as_bytes(), open_end) {
            Some(close) => (Some(open_end..close), tag_close_end(b, close)),
            None => (Some(open_end..b.len()), b.len()),
        };
    }

    // Containers (`noscript`, `template`, ...) nest by name.
    let open_prefix = format!("<{name}");
    let mut depth = 1usize;
    let mut at = open_end;
    while let Some(close) = find_tag(b, close_prefix.as_bytes(), at) {
        let mut nested = at;
        while let Some(open) = find_tag(b, open_prefix.as_bytes(), nested).filter(|&o| o < close) {
            depth += 1;
            nested = open + open_prefix.len();
        }
        depth -= 1;
        if depth == 0 {
            return (Some(open_end..close), tag_close_end(b, close));
        }
        at = close + close_prefix.len();
    }

    // Never closed: treat the start tag as the whole element.
    (None, open_end)
}

/// Lowercased copy of `html` with comments and text-only element bodies
/// blanked to spaces. Offsets match `html` byte for byte.
fn mask_opaque(html: &str) -> Vec<u8> {
    let mut b = html.to_ascii_lowercase().into_bytes();
    let mut pos = 0;

    while let Some(lt) = find_byte(&b, b'<', pos) {
        if b[lt..].starts_with(b"<!--") {
            let (_, end) = comment_bounds(&b, lt);
            b[lt..end].fill(b' ');
            pos = end;
            continue;
        }

        let body = tag_name_end(&b, lt).and_then(|name_end| {
            let name = std::str::from_utf8(&b[lt + 1..name_end]).ok()?;
            if !is_text_only(name) {
                return None;
            }
            let close_prefix = format!("</{name}");
            let open_end = start_tag_end(&b, name_end)?;
            let close = find_tag(&b, close_prefix.as_bytes(), open_end).unwrap_or(b.len());
            Some(open_end..close)
        });

        match body {
            Some(body) => {
                pos = body.end.max(lt + 1);
                b[body].fill(b' ');
            }
            None => pos = lt + 1,
        }
    }

    b
}
