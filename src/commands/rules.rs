//! `navmark rules` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::SiteConfig;
use crate::nav::SectionMatch;

/// Print the effective section table, home document, and promotion rule.
///
/// # Errors
///
/// Returns an error if a configured file cannot be loaded.
pub fn run(config: Option<&Path>) -> Result<(), String> {
    let config = SiteConfig::discover(config)?;
    print!("{}", describe(&config));
    Ok(())
}

fn describe(config: &SiteConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "home: {}", config.home_document);
    if config.sections.is_empty() {
        out.push_str("no section rules\n");
    }
    for (i, rule) in config.sections.iter().enumerate() {
        let _ = match rule.matching {
            SectionMatch::Label => writeln!(
                out,
                "{}. {} -> \"{}\" by label, sub-links by ?{}",
                i + 1,
                rule.path,
                rule.label,
                rule.query_key
            ),
            SectionMatch::Href => {
                writeln!(out, "{}. {} -> \"{}\" by link", i + 1, rule.path, rule.label)
            }
        };
    }
    let promotion = &config.promotion;
    if promotion.family.is_empty() {
        out.push_str("promotion: off\n");
    } else {
        let _ = writeln!(
            out,
            "promotion: {} or {} except {}",
            promotion.subpage, promotion.family, promotion.canonical
        );
    }
    out
}
