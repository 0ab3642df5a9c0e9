//! Page metadata record.
//!
//! `PageMeta` is read-only input to [`crate::sync::apply_page_meta`]. Keys
//! (de)serialize in camelCase (`ogTitle`, `ogImage`, ...), the same shape
//! used by `seo.toml` pages and `--meta` JSON files.

mod schema;

pub use schema::{Schema, SchemaError};

use serde::{Deserialize, Serialize};

/// SEO metadata for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// `Some` only for a non-empty string.
#[inline]
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl PageMeta {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_og_title(mut self, og_title: impl Into<String>) -> Self {
        self.og_title = Some(og_title.into());
        self
    }

    pub fn with_og_description(mut self, og_description: impl Into<String>) -> Self {
        self.og_description = Some(og_description.into());
        self
    }

    pub fn with_og_image(mut self, og_image: impl Into<String>) -> Self {
        self.og_image = Some(og_image.into());
        self
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    // Optional fields count as missing when empty, so `keywords = ""`
    // neither creates a tag nor blanks an existing one.

    pub fn keywords(&self) -> Option<&str> {
        present(&self.keywords)
    }

    /// `og:title` content, falling back to the page title.
    pub fn og_title(&self) -> &str {
        present(&self.og_title).unwrap_or(self.title.as_str())
    }

    /// `og:description` content, falling back to the description.
    pub fn og_description(&self) -> &str {
        present(&self.og_description).unwrap_or(self.description.as_str())
    }

    pub fn og_image(&self) -> Option<&str> {
        present(&self.og_image)
    }

    pub fn canonical(&self) -> Option<&str> {
        present(&self.canonical)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}
