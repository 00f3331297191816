//! `navmark tours` command.

use std::path::Path;

use url::Url;

use crate::catalog::render::render_for_url;
use crate::catalog::Catalog;

/// Render the tour listing selected by `url` from the catalog at `catalog`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the URL is invalid.
pub fn run(catalog: &Path, url: &str) -> Result<(), String> {
    let url = Url::parse(url).map_err(|e| format!("Invalid URL {url}: {e}"))?;
    let catalog = Catalog::load(catalog)?;
    let page = render_for_url(&catalog, &url);
    println!("<h1>{}</h1>", crate::catalog::render::escape(&page.title));
    print!("{}", page.html);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use std::path::Path;

    #[test]
    fn missing_catalog_is_an_error() {
        let err = run(Path::new("/nonexistent/tours.yaml"), "https://example.com/").unwrap_err();
        assert!(err.contains("tours.yaml"));
    }
}
