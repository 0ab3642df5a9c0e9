//! seohead - keep a page's `<head>` in sync with its SEO metadata.
//!
//! [`sync::apply_page_meta`] writes a [`meta::PageMeta`] into anything
//! implementing [`head::Head`]: title, `meta` tags, OpenGraph tags, the
//! canonical link and a JSON-LD block. [`head::HeadDocument`] is the
//! in-memory implementation used for HTML files; [`registry::Registry`]
//! holds per-page metadata, optionally extended by `seo.toml`.
//!
//! ```
//! use seohead::head::{parse_document, splice_head};
//! use seohead::meta::PageMeta;
//! use seohead::sync::apply_page_meta;
//!
//! let page = "<html><head></head><body></body></html>";
//! let (mut head, span) = parse_document(page).unwrap();
//! apply_page_meta(&mut head, &PageMeta::new("Home", "Welcome")).unwrap();
//!
//! let html = splice_head(page, span, &head);
//! assert!(html.contains("<title>Home</title>"));
//! ```

pub mod logger;

pub mod cli;
pub mod config;
pub mod head;
pub mod meta;
pub mod registry;
pub mod sync;
pub mod utils;

pub use head::{Head, HeadDocument};
pub use meta::{PageMeta, Schema};
pub use registry::Registry;
pub use sync::apply_page_meta;
