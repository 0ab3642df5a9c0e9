//! `validate` command.

use anyhow::{Result, bail};

use crate::config::SeoConfig;
use crate::log;

/// Check every page; fails with the full diagnostic list on errors.
pub fn validate_pages(config: &SeoConfig) -> Result<()> {
    let (registry, diag) = config.resolve();

    if let Some(path) = &config.config_path {
        log!("validate"; "checking {} page(s) from {}", registry.len(), path.display());
    } else {
        log!("validate"; "checking {} built-in page(s)", registry.len());
    }

    diag.print_warnings();

    if diag.has_errors() {
        eprintln!("{diag}");
        bail!(
            "validation failed: {} error{}",
            diag.len(),
            if diag.len() == 1 { "" } else { "s" }
        );
    }

    log!("validate"; "all pages valid");
    Ok(())
}
