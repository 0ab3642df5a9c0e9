//! Head synchronizer (PageMeta → head).
//!
//! Writes title, meta, OpenGraph, canonical and JSON-LD for one page into
//! a [`Head`]. Elements are found by attribute and updated in place, or
//! created and appended when missing. Nothing is ever removed, so a tag set
//! by an earlier call survives a later call that omits the field.
//!
//! Steps run in a fixed order; the first failing head operation aborts the
//! rest and is returned as-is.

use thiserror::Error;

use crate::head::{ElementId, Head, HeadError, Selector};
use crate::meta::PageMeta;

/// Marker attribute on the managed structured-data `<script>`.
pub const SCHEMA_MARKER: &str = "data-seo-schema";

/// MIME type of the structured-data `<script>`.
pub const JSON_LD_TYPE: &str = "application/ld+json";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to update {target}")]
    Head {
        target: String,
        #[source]
        source: HeadError,
    },
}

/// Which attribute keys a `<meta>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaKey {
    Name,
    Property,
}

impl MetaKey {
    const fn attr(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

/// Make `head` reflect `meta`.
///
/// `title` and `description` are written even when empty.
pub fn apply_page_meta<H: Head + ?Sized>(head: &mut H, meta: &PageMeta) -> Result<(), SyncError> {
    head.set_title(&meta.title).map_err(at("<title>"))?;

    // `<meta name="title">` duplicates `<title>`; kept for crawlers that read it.
    update_meta(head, MetaKey::Name, "title", &meta.title)?;
    update_meta(head, MetaKey::Name, "description", &meta.description)?;
    if let Some(keywords) = meta.keywords() {
        update_meta(head, MetaKey::Name, "keywords", keywords)?;
    }

    update_meta(head, MetaKey::Property, "og:title", meta.og_title())?;
    update_meta(head, MetaKey::Property, "og:description", meta.og_description())?;
    if let Some(image) = meta.og_image() {
        update_meta(head, MetaKey::Property, "og:image", image)?;
    }

    if let Some(href) = meta.canonical() {
        let selector = Selector::attr_eq("link", "rel", "canonical");
        let link = find_or_create(head, &selector, |head, id| {
            head.set_attribute(id, "rel", "canonical")
        })
        .map_err(at(&selector))?;
        head.set_attribute(link, "href", href).map_err(at(&selector))?;
    }

    if let Some(schema) = meta.schema() {
        let selector = Selector::has_attr("script", SCHEMA_MARKER);
        let script = find_or_create(head, &selector, |head, id| {
            head.set_attribute(id, "type", JSON_LD_TYPE)?;
            head.set_attribute(id, SCHEMA_MARKER, "true")
        })
        .map_err(at(&selector))?;
        head.set_text_content(script, &schema.to_json())
            .map_err(at(&selector))?;
    }

    crate::debug!("sync"; "applied `{}`", meta.title);
    Ok(())
}

/// Find-or-create a `<meta>` keyed by `name`/`property`, then set `content`.
fn update_meta<H: Head + ?Sized>(
    head: &mut H,
    key: MetaKey,
    value: &str,
    content: &str,
) -> Result<(), SyncError> {
    let selector = Selector::attr_eq("meta", key.attr(), value);
    let element = find_or_create(head, &selector, |head, id| {
        head.set_attribute(id, key.attr(), value)
    })
    .map_err(at(&selector))?;
    head.set_attribute(element, "content", content)
        .map_err(at(&selector))
}

/// Return the first element matching `selector`; otherwise create one,
/// let `init` put the identifying attributes on it, and append it.
fn find_or_create<H, F>(head: &mut H, selector: &Selector<'_>, init: F) -> Result<ElementId, HeadError>
where
    H: Head + ?Sized,
    F: FnOnce(&mut H, ElementId) -> Result<(), HeadError>,
{
    if let Some(id) = head.query(selector)? {
        return Ok(id);
    }

    let id = head.create_element(selector.tag)?;
    init(head, id)?;
    head.append_child(id)?;
    Ok(id)
}

fn at(target: impl ToString) -> impl FnOnce(HeadError) -> SyncError {
    let target = target.to_string();
    move |source| SyncError::Head { target, source }
}
