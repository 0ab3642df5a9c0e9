//! Page metadata configuration (`seo.toml`).
//!
//! # Sections
//!
//! | Section          | Purpose                                               |
//! |------------------|-------------------------------------------------------|
//! | `[site]`         | Site URL, used to resolve relative `canonical` values |
//! | `[registry]`     | Whether the built-in page table is included           |
//! | `[pages.<id>]`   | Page metadata, same keys as `PageMeta`                |
//!
//! ```toml
//! [site]
//! url = "https://example.com"
//!
//! [pages.pricing]
//! title = "Pricing"
//! description = "Plans and rates"
//! canonical = "/pricing"            # -> https://example.com/pricing
//!
//! [pages.pricing.schema]
//! "@type" = "Product"
//! ```

mod error;
mod field;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use field::FieldPath;

use crate::meta::PageMeta;
use crate::registry::Registry;
use crate::{debug, log};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, searched upward from the working directory.
pub const DEFAULT_CONFIG: &str = "seo.toml";

/// `[site]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Absolute site URL (e.g. `https://example.com`).
    pub url: Option<String>,
}

/// `[registry]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Start from the built-in page table.
    pub builtin: bool,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self { builtin: true }
    }
}

/// Root of `seo.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Absolute path of the loaded file (`None` for defaults).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub site: SiteSection,

    pub registry: RegistrySection,

    /// Raw page tables, checked one by one in [`SeoConfig::resolve`] so
    /// that a bad page is reported by id instead of failing the whole file.
    pub pages: toml::Table,
}

impl SeoConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `seo.toml` is searched
    /// upward from the working directory; if none is found the defaults
    /// (built-in registry only) are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match find_config_file(Path::new(DEFAULT_CONFIG)) {
                Some(path) => path,
                None => {
                    debug!("config"; "no {} found, using built-in pages", DEFAULT_CONFIG);
                    return Ok(Self::default());
                }
            },
        };

        let mut config = Self::from_path(&path)?;
        config.config_path = Some(path);
        Ok(config)
    }

    /// Load configuration from a file, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }
        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown top-level fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Build the registry and collect every problem found on the way.
    ///
    /// Pages that fail to deserialize are left out of the registry and
    /// reported under `pages.<id>`.
    pub fn resolve(&self) -> (Registry, ConfigDiagnostics) {
        let mut diag = ConfigDiagnostics::new();
        let pages_field = FieldPath::new("pages");

        let site_url = self.site_url(&mut diag);

        let mut registry = if self.registry.builtin {
            Registry::builtin()
        } else {
            Registry::new()
        };

        for (id, value) in &self.pages {
            let field = pages_field.join(id);
            match parse_page(value.clone(), &field, &mut diag) {
                Ok(mut meta) => {
                    resolve_canonical(&mut meta, site_url.as_ref(), &field, &mut diag);
                    registry.insert(id.clone(), meta);
                }
                Err(e) => diag.error(field, e.message().to_string()),
            }
        }

        diag.merge(registry.validate());
        (registry, diag)
    }

    /// Build the registry, failing on any error diagnostic.
    pub fn into_registry(self) -> Result<Registry, ConfigError> {
        let (registry, diag) = self.resolve();
        diag.print_warnings();
        diag.into_result()?;
        Ok(registry)
    }

    fn site_url(&self, diag: &mut ConfigDiagnostics) -> Option<url::Url> {
        let raw = self.site.url.as_deref()?;
        match url::Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                diag.error_with_hint(
                    FieldPath::new("site.url"),
                    format!("`{raw}` is not an absolute URL: {e}"),
                    "e.g. `https://example.com`",
                );
                None
            }
        }
    }
}

fn parse_page(
    value: toml::Value,
    field: &FieldPath,
    diag: &mut ConfigDiagnostics,
) -> Result<PageMeta, toml::de::Error> {
    let mut unknown = Vec::new();
    let meta = serde_ignored::deserialize(value, |path: serde_ignored::Path| {
        unknown.push(path.to_string());
    })?;
    for key in unknown {
        diag.warn(field.join(&key), "unknown field, ignored");
    }
    Ok(meta)
}

/// Turn a relative `canonical` (e.g. `/pricing`) into an absolute URL
/// using `[site] url`.
fn resolve_canonical(
    meta: &mut PageMeta,
    site_url: Option<&url::Url>,
    field: &FieldPath,
    diag: &mut ConfigDiagnostics,
) {
    let Some(canonical) = meta.canonical().map(str::to_string) else {
        return;
    };
    if url::Url::parse(&canonical).is_ok() {
        return;
    }

    match site_url.map(|base| base.join(&canonical)) {
        Some(Ok(joined)) => meta.canonical = Some(joined.to_string()),
        Some(Err(e)) => diag.error(
            field.join("canonical"),
            format!("cannot resolve `{canonical}`: {e}"),
        ),
        // Left relative; `Registry::validate` reports it.
        None => {}
    }
}

/// Find config file by searching upward from current directory
///
/// ```text
/// /home/user/site/public/blog/   ← cwd
/// /home/user/site/seo.toml       ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {}", field);
    }
}
