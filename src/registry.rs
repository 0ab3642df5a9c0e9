//! Page metadata registry.
//!
//! Maps page ids (`home`, `contact`, ...) to [`PageMeta`]. The built-in
//! table describes the marketing site; `seo.toml` can add pages or replace
//! built-in ones. Page ids are not tied to routes; the caller maps a route
//! to an id.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::meta::PageMeta;

const SITE: &str = "https://coreflowautomation.net";

struct BuiltinPage {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    keywords: &'static str,
    path: &'static str,
}

const BUILTIN: &[BuiltinPage] = &[
    BuiltinPage {
        id: "home",
        title: "AI Automation Agency | Coreflow Automation",
        description: "AI automation agency designing and deploying custom automation systems for sales, support, and operations. We build business automation systems that replace manual workflows with scalable infrastructure.",
        keywords: "AI automation agency, business automation systems, AI automation for sales, AI automation for support, operational automation",
        path: "/",
    },
    BuiltinPage {
        id: "solutions",
        title: "AI Automation Solutions | Custom Business Process Automation",
        description: "Custom AI automation systems for sales, customer support, and internal operations. Each solution replaces specific manual workflows with structured AI automation.",
        keywords: "AI automation solutions, business process automation, AI customer support, AI sales automation, lead qualification automation",
        path: "/solutions",
    },
    BuiltinPage {
        id: "howItWorks",
        title: "How AI Automation Systems Are Built | Coreflow Process",
        description: "Standardized AI automation delivery process: audit and workflow mapping, custom system design, deployment and optimization. Focus on stability and operational infrastructure.",
        keywords: "AI automation process, business automation methodology, system design, automation deployment",
        path: "/how-it-works",
    },
    BuiltinPage {
        id: "examples",
        title: "AI Automation Examples | Real-World Business Process Automation",
        description: "Live example AI automation systems demonstrating real-world business process automation for sales, customer support, and operations.",
        keywords: "automation examples, AI system examples, business process automation examples, voice automation, chat automation",
        path: "/examples",
    },
    BuiltinPage {
        id: "team",
        title: "Team | AI Automation Agency | Coreflow",
        description: "The team that designs and implements production-grade AI automation systems for businesses.",
        keywords: "AI automation team, automation experts, system designers",
        path: "/team",
    },
    BuiltinPage {
        id: "growthFramework",
        title: "Growth Framework | AI Automation Strategy for Businesses",
        description: "Business automation strategy for designing scalable AI automation systems. ROI Track and Custom System Track engagement models.",
        keywords: "AI automation strategy, business automation framework, automation engagement models, ROI automation",
        path: "/growth-framework",
    },
    BuiltinPage {
        id: "contact",
        title: "Request an Automation Audit | Coreflow Automation",
        description: "Schedule an AI automation audit to assess your workflows, identify bottlenecks, and define automation opportunities.",
        keywords: "automation audit, business automation assessment, automation consultation",
        path: "/contact",
    },
];

impl BuiltinPage {
    fn to_meta(&self) -> PageMeta {
        PageMeta::new(self.title, self.description)
            .with_keywords(self.keywords)
            .with_canonical(format!("{SITE}{}", self.path))
    }
}

/// Ordered id → metadata table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pages: Vec<(String, PageMeta)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in marketing-site table.
    pub fn builtin() -> Self {
        Self {
            pages: BUILTIN
                .iter()
                .map(|page| (page.id.to_string(), page.to_meta()))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PageMeta> {
        self.pages.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Add a page, replacing an existing entry with the same id in place.
    pub fn insert(&mut self, id: impl Into<String>, meta: PageMeta) {
        let id = id.into();
        match self.pages.iter_mut().find(|(k, _)| *k == id) {
            Some((_, existing)) => *existing = meta,
            None => self.pages.push((id, meta)),
        }
    }

    /// Insert every page from `pages`.
    pub fn overlay(mut self, pages: impl IntoIterator<Item = (String, PageMeta)>) -> Self {
        for (id, meta) in pages {
            self.insert(id, meta);
        }
        self
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageMeta)> {
        self.pages.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check every entry: non-empty title and description, and an absolute
    /// `https` canonical URL when one is set.
    pub fn validate(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        for (id, meta) in self.iter() {
            check_page(&mut diag, id, meta);
        }
        diag
    }
}

fn check_page(diag: &mut ConfigDiagnostics, id: &str, meta: &PageMeta) {
    let field = |name: &str| FieldPath::new(format!("pages.{id}.{name}"));

    if meta.title.trim().is_empty() {
        diag.error(field("title"), "title is empty");
    }
    if meta.description.trim().is_empty() {
        diag.error(field("description"), "description is empty");
    }

    if let Some(canonical) = meta.canonical() {
        match url::Url::parse(canonical) {
            Ok(url) if url.scheme() == "https" && url.has_host() => {}
            Ok(url) => diag.error_with_hint(
                field("canonical"),
                format!("`{canonical}` is not an https URL (scheme `{}`)", url.scheme()),
                "canonical links should use the site's https address",
            ),
            Err(e) => diag.error_with_hint(
                field("canonical"),
                format!("`{canonical}` is not an absolute URL: {e}"),
                "use a fully qualified URL like `https://example.com/page`",
            ),
        }
    }

    if let Some(image) = meta.og_image()
        && let Err(e) = url::Url::parse(image)
    {
        diag.warn(field("ogImage"), format!("`{image}` is not an absolute URL: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pages() {
        let registry = Registry::builtin();
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(
            ids,
            [
                "home",
                "solutions",
                "howItWorks",
                "examples",
                "team",
                "growthFramework",
                "contact"
            ]
        );

        let home = registry.get("home").unwrap();
        assert_eq!(home.canonical(), Some("https://coreflowautomation.net/"));
        assert_eq!(
            registry.get("howItWorks").and_then(PageMeta::canonical),
            Some("https://coreflowautomation.net/how-it-works")
        );
        assert!(registry.get("pricing").is_none());
    }

    #[test]
    fn test_builtin_entries_are_sane() {
        let registry = Registry::builtin();
        for (id, meta) in registry.iter() {
            assert!(!meta.title.is_empty(), "{id}: empty title");
            assert!(!meta.description.is_empty(), "{id}: empty description");
            if let Some(canonical) = meta.canonical() {
                assert!(canonical.starts_with("https://"), "{id}: {canonical}");
            }
        }
        assert!(registry.validate().is_empty());
    }

    #[test]
    fn test_overlay_replaces_in_place_and_appends() {
        let registry = Registry::builtin().overlay([
            ("team".to_string(), PageMeta::new("Our people", "Who we are")),
            ("pricing".to_string(), PageMeta::new("Pricing", "Plans")),
        ]);

        assert_eq!(registry.len(), 8);
        assert_eq!(registry.get("team").unwrap().title, "Our people");
        assert_eq!(registry.ids().nth(4), Some("team"));
        assert_eq!(registry.ids().last(), Some("pricing"));
    }

    #[test]
    fn test_validate_reports_bad_entries() {
        let mut registry = Registry::new();
        registry.insert("blank", PageMeta::new(" ", ""));
        registry.insert(
            "http",
            PageMeta::new("T", "D").with_canonical("http://example.com/"),
        );
        registry.insert("relative", PageMeta::new("T", "D").with_canonical("/about"));

        let diag = registry.validate();
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "pages.blank.title",
                "pages.blank.description",
                "pages.http.canonical",
                "pages.relative.canonical"
            ]
        );
    }

    #[test]
    fn test_validate_warns_on_relative_og_image() {
        let mut registry = Registry::new();
        registry.insert("p", PageMeta::new("T", "D").with_og_image("/og.png"));
        let diag = registry.validate();
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
