//! `apply` command: write page metadata into an HTML document.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::ApplyArgs;
use crate::config::SeoConfig;
use crate::head::{parse_document, splice_head};
use crate::meta::PageMeta;
use crate::sync::apply_page_meta;
use crate::{debug, log};

pub fn run_apply(args: &ApplyArgs, config: SeoConfig) -> Result<()> {
    let meta = load_meta(args, config)?;

    let html = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read `{}`", args.file.display()))?;
    let updated = apply_to_html(&html, &meta)
        .with_context(|| format!("failed to update `{}`", args.file.display()))?;

    let target = if args.in_place {
        Some(args.file.as_path())
    } else {
        args.output.as_deref()
    };

    match target {
        Some(path) => {
            fs::write(path, &updated)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("apply"; "{} -> {}", meta.title, path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(updated.as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}

/// Apply `meta` to a full HTML page and return the new page.
///
/// Only the inner markup of `<head>` is rewritten.
pub fn apply_to_html(html: &str, meta: &PageMeta) -> Result<String> {
    let (mut head, span) = parse_document(html)?;
    let before = head.element_count();

    apply_page_meta(&mut head, meta)?;

    debug!("apply"; "head elements: {} -> {}", before, head.element_count());
    Ok(splice_head(html, span, &head))
}

fn load_meta(args: &ApplyArgs, config: SeoConfig) -> Result<PageMeta> {
    if let Some(path) = &args.meta {
        return read_meta_file(path);
    }

    let id = args
        .page
        .as_deref()
        .ok_or_else(|| anyhow!("either --page or --meta is required"))?;
    let registry = config.into_registry()?;

    match registry.get(id) {
        Some(meta) => Ok(meta.clone()),
        None => {
            let known = registry.ids().collect::<Vec<_>>().join(", ");
            Err(anyhow!("unknown page `{id}` (known pages: {known})"))
        }
    }
}

fn read_meta_file(path: &Path) -> Result<PageMeta> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid page metadata in `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PAGE: &str = "<!doctype html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>Old</title>\n</head>\n<body><h1>Hi</h1></body>\n</html>\n";

    fn args(file: PathBuf) -> ApplyArgs {
        ApplyArgs {
            file,
            page: None,
            meta: None,
            output: None,
            in_place: false,
        }
    }

    #[test]
    fn test_apply_to_html() {
        let meta = PageMeta::new("New & improved", "Desc")
            .with_canonical("https://example.com/x");
        let out = apply_to_html(PAGE, &meta).unwrap();

        assert!(out.starts_with("<!doctype html>\n<html>\n<head>"));
        assert!(out.ends_with("</head>\n<body><h1>Hi</h1></body>\n</html>\n"));
        assert!(out.contains("<meta charset=\"utf-8\">"));
        assert!(out.contains("<title>New &amp; improved</title>"));
        assert!(out.contains(r#"<meta name="title" content="New &amp; improved">"#));
        assert!(out.contains(r#"<meta property="og:description" content="Desc">"#));
        assert!(out.contains(r#"<link rel="canonical" href="https://example.com/x">"#));
    }

    #[test]
    fn test_apply_to_html_is_idempotent() {
        let meta = PageMeta::new("T", "D").with_keywords("k");
        let once = apply_to_html(PAGE, &meta).unwrap();
        let twice = apply_to_html(&once, &meta).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_keeps_scripts_and_styles_intact() {
        let page = concat!(
            "<html><head>",
            "<script>for(var i=0;i<n;i++){x()}</script>",
            "<style>a>b{c:d}</style>",
            r#"<meta id="m" class="c" name="x" content="y"/>"#,
            "</head><body></body></html>"
        );
        let out = apply_to_html(page, &PageMeta::new("T", "D")).unwrap();

        assert!(out.contains("\n    <script>for(var i=0;i<n;i++){x()}</script>\n"));
        assert!(out.contains("\n    <style>a>b{c:d}</style>\n"));
        assert!(out.contains("\n    <meta id=\"m\" class=\"c\" name=\"x\" content=\"y\"/>\n"));
        assert!(out.contains("<title>T</title>"));
    }

    #[test]
    fn test_apply_keeps_title_text_with_angle_bracket() {
        let page = "<html><head><title>a < b</title></head></html>";
        let (head, _) = parse_document(page).unwrap();
        assert_eq!(head.title().as_deref(), Some("a < b"));

        let out = apply_to_html(page, &PageMeta::new("c < d", "D")).unwrap();
        assert!(out.contains("<title>c &lt; d</title>"));
        assert_eq!(out.matches("<title>").count(), 1);
    }

    #[test]
    fn test_apply_ignores_head_inside_comment() {
        let page = "<!-- <head> --><html><head><title>x</title></head><body></body></html>";
        let out = apply_to_html(page, &PageMeta::new("T", "D")).unwrap();

        assert!(out.starts_with("<!-- <head> --><html><head>\n    <title>T</title>"));
        assert!(out.ends_with("</head><body></body></html>"));
    }

    #[test]
    fn test_apply_twice_keeps_entities_in_stray_text() {
        let page = "<html><head>a &amp; b<title>x</title></head></html>";
        let meta = PageMeta::new("T", "D");

        let once = apply_to_html(page, &meta).unwrap();
        let twice = apply_to_html(&once, &meta).unwrap();
        assert!(once.contains("\n    a &amp; b\n"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_updated_canonical_keeps_attribute_order() {
        let page = r#"<html><head><link id="c" class="k" rel="canonical" href="/old"></head></html>"#;
        let meta = PageMeta::new("T", "D").with_canonical("https://example.com/new");
        let out = apply_to_html(page, &meta).unwrap();

        assert!(out.contains(
            r#"<link id="c" class="k" rel="canonical" href="https://example.com/new">"#
        ));
    }

    #[test]
    fn test_apply_to_html_without_head() {
        let err = apply_to_html("<html><body></body></html>", &PageMeta::new("T", "D"));
        assert!(err.is_err());
    }

    #[test]
    fn test_run_apply_registry_page_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("contact.html");
        fs::write(&file, PAGE).unwrap();

        let mut args = args(file.clone());
        args.page = Some("contact".into());
        args.in_place = true;
        run_apply(&args, SeoConfig::default()).unwrap();

        let out = fs::read_to_string(&file).unwrap();
        assert!(out.contains("<title>Request an Automation Audit | Coreflow Automation</title>"));
        assert!(out.contains(r#"href="https://coreflowautomation.net/contact""#));
    }

    #[test]
    fn test_run_apply_meta_file_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        let meta_file = dir.path().join("meta.json");
        let output = dir.path().join("out.html");
        fs::write(&file, PAGE).unwrap();
        fs::write(
            &meta_file,
            r#"{"title":"Acme","description":"Widgets","schema":{"@type":"Organization","name":"Acme"}}"#,
        )
        .unwrap();

        let mut args = args(file.clone());
        args.meta = Some(meta_file);
        args.output = Some(output.clone());
        run_apply(&args, SeoConfig::default()).unwrap();

        let out = fs::read_to_string(&output).unwrap();
        assert!(out.contains(
            r#"<script type="application/ld+json" data-seo-schema="true">{"@type":"Organization","name":"Acme"}</script>"#
        ));
        // Input left untouched
        assert_eq!(fs::read_to_string(&file).unwrap(), PAGE);
    }

    #[test]
    fn test_run_apply_unknown_page() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        fs::write(&file, PAGE).unwrap();

        let mut args = args(file);
        args.page = Some("pricing".into());
        let err = run_apply(&args, SeoConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown page `pricing`"));
        assert!(message.contains("home"));
    }

    #[test]
    fn test_run_apply_invalid_meta_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        let meta_file = dir.path().join("meta.json");
        fs::write(&file, PAGE).unwrap();
        fs::write(&meta_file, r#"{"title":"No description"}"#).unwrap();

        let mut args = args(file);
        args.meta = Some(meta_file);
        assert!(run_apply(&args, SeoConfig::default()).is_err());
    }
}
