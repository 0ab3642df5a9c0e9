//! `list` and `show` commands.

use std::io::{self, Write};

use anyhow::{Result, anyhow};
use owo_colors::OwoColorize;

use crate::config::SeoConfig;
use crate::meta::Schema;
use crate::registry::Registry;

/// Print `id  title` for every registered page, plus the JSON-LD
/// `@type` when the page carries a schema.
pub fn list_pages(config: SeoConfig) -> Result<()> {
    let registry = config.into_registry()?;
    let mut out = io::stdout().lock();
    write_listing(&mut out, &registry)?;
    out.flush()?;
    Ok(())
}

fn write_listing(out: &mut impl Write, registry: &Registry) -> io::Result<()> {
    let width = registry.ids().map(str::len).max().unwrap_or(0);
    for (id, meta) in registry.iter() {
        write!(out, "{}  {}", format!("{id:<width$}").bold(), meta.title)?;
        if let Some(kind) = meta.schema().and_then(Schema::schema_type) {
            write!(out, "  {}", format!("[{kind}]").dimmed())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print one page's metadata as pretty JSON.
pub fn show_page(id: &str, config: SeoConfig) -> Result<()> {
    let registry = config.into_registry()?;
    let meta = registry
        .get(id)
        .ok_or_else(|| anyhow!("unknown page `{id}`"))?;

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, meta)?;
    writeln!(out)?;
    Ok(())
}
