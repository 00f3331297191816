//! `navmark resolve` command.

use std::path::Path;

use url::Url;

use super::format_mark;
use crate::adapters::memory::MemoryDocument;
use crate::config::SiteConfig;
use crate::context::RunContext;
use crate::nav::{Resolution, Resolver};

/// Resolve `url` once against the navigation fixture at `nav` and print the
/// selected stage and every applied mark.
///
/// # Errors
///
/// Returns an error if the fixture, the configuration, or the URL is invalid.
pub fn run(ctx: &RunContext, nav: &Path, url: &str, config: Option<&Path>) -> Result<(), String> {
    let config = SiteConfig::discover(config)?;
    let url = Url::parse(url).map_err(|e| format!("Invalid URL {url}: {e}"))?;
    let doc = MemoryDocument::load(nav)?;

    print!("{}", resolve_once(ctx, doc, &url, config));
    Ok(())
}

fn resolve_once(ctx: &RunContext, doc: MemoryDocument, url: &Url, config: SiteConfig) -> String {
    let mut resolver = Resolver::new(config);
    let mut doc = ctx.document(doc);
    let resolution = resolver.resolve(&mut doc, url);

    let mut out = String::new();
    if let Resolution::Applied { plan, marks } = &resolution {
        out.push_str(&format!("plan: {plan}\n"));
        if marks.is_empty() {
            out.push_str("no elements marked\n");
        }
        for mark in marks {
            out.push_str(&format_mark(doc.inner(), mark));
            out.push('\n');
        }
    }
    out.push_str(&format!("{} element writes\n", doc.write_count()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.add_link("/", "Home");
        let tours = doc.add_group("Tour Packages", None);
        doc.add_group_link(tours, "/pages/tourfinal.html?category=city-tour", "City");
        doc.add_link("/pages/contact.html", "Contact");
        doc
    }

    fn url(path: &str) -> Url {
        Url::parse("https://example.com").unwrap().join(path).unwrap()
    }

    #[test]
    fn prints_plan_and_marks() {
        let out = resolve_once(
            &RunContext::live(),
            nav(),
            &url("/pages/tourfinal.html?category=city-tour"),
            SiteConfig::default(),
        );
        assert!(out.starts_with("plan: section \"Tour Packages\" (category=city-tour)\n"));
        assert!(out.contains("top-level #1 button \"Tour Packages\""));
        assert!(out.contains("sub       #2 link \"City\""));
    }

    #[test]
    fn reports_when_nothing_matches() {
        let out = resolve_once(
            &RunContext::live(),
            nav(),
            &url("/pages/blog.html"),
            SiteConfig::default(),
        );
        assert!(out.contains("plan: fallback blog.html"));
        assert!(out.contains("no elements marked"));
    }

    #[test]
    fn run_rejects_relative_url() {
        let err = run(&RunContext::live(), Path::new("unused.yaml"), "/pages/a.html", None)
            .unwrap_err();
        assert!(err.contains("Invalid URL"));
    }
}
