//! `HeadDocument` -> HTML.

use std::fmt::Write as _;

use super::{Content, HeadDocument, HeadElement, HeadNode, HeadSpan};
use crate::utils::html::{escape, escape_attr, escape_script, is_raw_text_element, is_void_element};

const INDENT: &str = "    ";

/// Render the head's children, one node per line.
///
/// Output is the inner markup only; the `<head>` tags themselves stay
/// with the page (see [`splice_head`]). Elements that still carry their
/// parsed source, comments and stray text are written as they were read.
pub fn render_head(head: &HeadDocument) -> String {
    let mut out = String::new();
    for node in head.children() {
        out.push('\n');
        out.push_str(INDENT);
        match node {
            HeadNode::Element(id) => {
                if let Some(element) = head.element(*id) {
                    write_element(&mut out, element);
                }
            }
            HeadNode::Comment(body) => {
                let _ = write!(out, "<!--{body}-->");
            }
            HeadNode::Text(text) => out.push_str(text),
        }
    }
    out.push('\n');
    out
}

fn write_element(out: &mut String, element: &HeadElement) {
    if let Some(source) = element.source() {
        out.push_str(source);
        return;
    }

    let tag = element.tag.as_str();

    out.push('<');
    out.push_str(tag);
    for (name, value) in element.attrs() {
        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
    }
    out.push('>');

    if is_void_element(tag) {
        return;
    }

    match element.content() {
        Content::Empty => {}
        Content::Raw(raw) => out.push_str(raw),
        Content::Text(text) if is_raw_text_element(tag) => out.push_str(&escape_script(text)),
        Content::Text(text) => out.push_str(&escape(text)),
    }

    let _ = write!(out, "</{tag}>");
}

/// Replace the inner markup of the page's head with `head`.
///
/// Bytes outside `span.inner_start..span.inner_end` are copied unchanged.
pub fn splice_head(html: &str, span: HeadSpan, head: &HeadDocument) -> String {
    let inner = render_head(head);
    let mut out = String::with_capacity(html.len() + inner.len());
    out.push_str(&html[..span.inner_start]);
    out.push_str(&inner);
    out.push_str(&html[span.inner_end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::{Head, parse_document};

    #[test]
    fn test_render_escapes_attributes_and_text() {
        let mut head = HeadDocument::new();
        head.set_title("Q&A <live>").unwrap();
        let id = head.create_element("meta").unwrap();
        head.set_attribute(id, "name", "description").unwrap();
        head.set_attribute(id, "content", "say \"hi\" & go").unwrap();
        head.append_child(id).unwrap();

        let html = render_head(&head);
        assert!(html.contains("<title>Q&amp;A &lt;live&gt;</title>"));
        assert!(html.contains(r#"<meta name="description" content="say &quot;hi&quot; &amp; go">"#));
        assert!(!html.contains("</meta>"));
    }

    #[test]
    fn test_render_script_text_is_raw() {
        let mut head = HeadDocument::new();
        let id = head.create_element("script").unwrap();
        head.set_attribute(id, "type", "application/ld+json").unwrap();
        head.set_text_content(id, r#"{"name":"A & B","x":"</script>"}"#).unwrap();
        head.append_child(id).unwrap();

        let html = render_head(&head);
        assert!(html.contains(r#"{"name":"A & B","x":"<\/script>"}</script>"#));
    }

    #[test]
    fn test_splice_keeps_outside_bytes() {
        let page = "<!doctype html>\n<html><head class=\"x\"><title>a</title></head>\n<body>B</body></html>";
        let (mut head, span) = parse_document(page).unwrap();
        head.set_title("b").unwrap();

        let out = splice_head(page, span, &head);
        assert!(out.starts_with("<!doctype html>\n<html><head class=\"x\">"));
        assert!(out.ends_with("</head>\n<body>B</body></html>"));
        assert!(out.contains("<title>b</title>"));
        assert!(!out.contains("<title>a</title>"));
    }

    #[test]
    fn test_unmodified_elements_keep_source() {
        let page = "<html><head><LINK id=\"c\" class=\"k\" rel=stylesheet href='/a.css'/>a &amp; b<title>x</title></head></html>";
        let (mut head, span) = parse_document(page).unwrap();
        head.set_title("y").unwrap();

        let out = splice_head(page, span, &head);
        assert!(out.contains("<LINK id=\"c\" class=\"k\" rel=stylesheet href='/a.css'/>"));
        assert!(out.contains("a &amp; b"));
        assert!(out.contains("<title>y</title>"));
    }

    #[test]
    fn test_render_parse_round_trip_is_stable() {
        let page = "<html><head><meta charset=\"utf-8\"><!-- keep --><title>T</title></head><body></body></html>";
        let (head, span) = parse_document(page).unwrap();
        let once = splice_head(page, span, &head);

        let (head, span) = parse_document(&once).unwrap();
        let twice = splice_head(&once, span, &head);
        assert_eq!(once, twice);
        assert!(twice.contains("<!-- keep -->"));
    }
}
