//! `navmark session` command.

use std::fmt::Write as _;
use std::path::Path;

use url::Url;

use super::format_mark;
use crate::adapters::memory::MemoryDocument;
use crate::adapters::recording::RecordingDocument;
use crate::adapters::verifying::VerifyingDocument;
use crate::cassette::format::Cassette;
use crate::config::SiteConfig;
use crate::context::RunContext;
use crate::nav::{MutationRecord, NavSession, Resolution};
use crate::ports::NavDocument;
use crate::script::{ScriptEvent, SessionScript};

/// A document stack with the in-memory page at the bottom.
trait PageHost: NavDocument {
    fn page(&self) -> &MemoryDocument;
    fn page_mut(&mut self) -> &mut MemoryDocument;
}

impl PageHost for MemoryDocument {
    fn page(&self) -> &MemoryDocument {
        self
    }

    fn page_mut(&mut self) -> &mut MemoryDocument {
        self
    }
}

impl<D: PageHost> PageHost for RecordingDocument<D> {
    fn page(&self) -> &MemoryDocument {
        self.inner().page()
    }

    fn page_mut(&mut self) -> &mut MemoryDocument {
        self.inner_mut().page_mut()
    }
}

impl<D: PageHost> PageHost for VerifyingDocument<D> {
    fn page(&self) -> &MemoryDocument {
        self.inner().page()
    }

    fn page_mut(&mut self) -> &mut MemoryDocument {
        self.inner_mut().page_mut()
    }
}

/// Drive a page session over the fixture at `nav` with the events in
/// `script`, printing the outcome of each event.
///
/// With `expect`, every element write is checked against the recorded
/// cassette and any divergence fails the command.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, an event is invalid, or
/// the run diverges from the expected cassette.
pub fn run(
    ctx: &RunContext,
    nav: &Path,
    script: &Path,
    expect: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), String> {
    let config = SiteConfig::discover(config)?;
    let script = SessionScript::load(script)?;
    let doc = MemoryDocument::load(nav)?;

    match expect {
        None => {
            let mut doc = ctx.document(doc);
            print!("{}", drive(&mut doc, &script, config)?);
            println!("{} element writes", doc.write_count());
        }
        Some(path) => {
            let cassette = Cassette::load(path)?;
            let mut doc = ctx.document(VerifyingDocument::new(doc, &cassette));
            print!("{}", drive(&mut doc, &script, config)?);
            let writes = doc.write_count();
            doc.into_inner().finish().map_err(|mismatches| {
                format!(
                    "Session diverged from {} ({} mismatches):\n  {}",
                    path.display(),
                    mismatches.len(),
                    mismatches.join("\n  ")
                )
            })?;
            println!("{writes} element writes verified against {}", cassette.name);
        }
    }
    Ok(())
}

/// Delivers every scripted event to one session and returns the report.
fn drive<D: PageHost>(
    doc: &mut D,
    script: &SessionScript,
    config: SiteConfig,
) -> Result<String, String> {
    let mut session = NavSession::new(config);
    let mut current: Option<Url> = None;
    let mut out = String::new();

    for event in &script.events {
        match event {
            ScriptEvent::Ready { path } => {
                let url = script.page_url(path)?;
                let resolution = session.on_ready(doc, &url);
                let _ = writeln!(out, "ready {path}: {}", summary(&resolution));
                report(&mut out, doc.page(), &resolution);
                current = Some(url);
            }
            ScriptEvent::Popstate { path } => {
                let url = script.page_url(path)?;
                let resolution = session.on_popstate(doc, &url);
                let _ = writeln!(out, "popstate {path}: {}", summary(&resolution));
                report(&mut out, doc.page(), &resolution);
                current = Some(url);
            }
            ScriptEvent::AppendLink { group, href, text } => {
                let link = doc.page_mut().append_link(*group, href, text)?;
                let records = [MutationRecord::child_list(1)];
                let outcome =
                    current.as_ref().and_then(|url| session.on_mutations(doc, url, &records));
                match outcome {
                    Some(resolution) => {
                        let _ = writeln!(out, "append {link}: {}", summary(&resolution));
                        report(&mut out, doc.page(), &resolution);
                    }
                    None => {
                        let _ = writeln!(out, "append {link}: not watching");
                    }
                }
            }
            ScriptEvent::Unload => {
                session.on_unload();
                out.push_str("unload: watcher released\n");
            }
        }
    }
    Ok(out)
}

fn summary(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Unchanged => "unchanged".to_string(),
        Resolution::Applied { plan, marks } => format!("{plan}, {} marked", marks.len()),
    }
}

fn report(out: &mut String, page: &MemoryDocument, resolution: &Resolution) {
    for mark in resolution.marks() {
        let _ = writeln!(out, "  {}", format_mark(page, mark));
    }
}
