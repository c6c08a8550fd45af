//! Site preview composition.
//!
//! [`compose_document`] turns a site's stored source files into one
//! self-contained HTML document for an isolated embedded viewer. It is a
//! pure function: no I/O, no side effects, and byte-identical output for
//! identical inputs. Every missing-input case maps to its own fallback
//! document so a viewer can always tell "no such site", "no index.html",
//! "empty site" and "fetch failed" apart.
//!
//! The markup, stylesheet and script bodies are inlined verbatim: the site
//! author is the only editor, so their content is trusted. The title is the
//! one untrusted string (it appears outside the author's own document) and
//! is escaped. Because author content runs as-is, the viewer must be
//! sandboxed with [`SANDBOX_ATTRIBUTES`].

use crate::errors::Result;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::{error, info};

/// Markup file the composer looks for
pub const INDEX_FILE: &str = "index.html";
/// Optional stylesheet inlined into the head
pub const STYLES_FILE: &str = "styles.css";
/// Optional script inlined at the end of the body
pub const SCRIPT_FILE: &str = "script.js";

/// Sandbox policy for the embedded viewer: scripts, forms and popups are
/// permitted; the host page's storage and top-level navigation are not.
pub const SANDBOX_ATTRIBUTES: &str = "allow-scripts allow-forms allow-popups";

/// Escapes a string for safe inclusion as HTML text content.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal document shell shared by all fallback pages.
fn status_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<body style=\"font-family: sans-serif; color: #333; text-align: center; padding-top: 2rem; margin: 0;\">\n{body}\n</body>\n</html>\n"
    )
}

/// Fallback shown when loading the site data itself failed.
#[must_use]
pub fn fetch_error_document(message: &str) -> String {
    status_document(&format!(
        "<h1>Error Loading Site</h1>\n<p>{}</p>\n<p>Please check the URL or try again later.</p>",
        escape_html(message)
    ))
}

/// Fallback shown when the site exists and has files, but no `index.html`.
#[must_use]
pub fn missing_index_document() -> String {
    status_document(
        "<h1>Preview Error</h1>\n<p><strong>index.html</strong> not found for this site.</p>\n<p>Add an index.html file to enable the preview.</p>",
    )
}

/// Fallback shown when the site exists but has no files at all.
#[must_use]
pub fn empty_site_document() -> String {
    status_document("<p>Site content is not available or is empty.</p>")
}

/// Fallback shown when no site exists for the requested slug.
#[must_use]
pub fn site_not_found_document() -> String {
    status_document(
        "<h1>Site Not Found</h1>\n<p>No site exists at this address.</p>\n<p>Check the link or return to the dashboard.</p>",
    )
}

/// Assembles one renderable document from a site's file map.
///
/// The stylesheet content is inlined into a style block in the head, the
/// markup verbatim into the body, and the script into a script block at the
/// end of the body. Absent stylesheet or script files inline as empty
/// blocks. An absent `index.html` yields [`missing_index_document`]; an
/// empty map yields [`empty_site_document`].
#[must_use]
pub fn compose_document(files: &HashMap<String, String>, title: &str) -> String {
    if files.is_empty() {
        return empty_site_document();
    }

    let Some(markup) = files.get(INDEX_FILE) else {
        return missing_index_document();
    };
    let styles = files.get(STYLES_FILE).map(String::as_str).unwrap_or_default();
    let script = files.get(SCRIPT_FILE).map(String::as_str).unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style type=\"text/css\">\n{styles}\n</style>\n\
         </head>\n\
         <body>\n\
         {markup}\n\
         <script type=\"text/javascript\">\n{script}\n</script>\n\
         </body>\n\
         </html>\n",
        title = escape_html(title),
    )
}

/// Loads the site addressed by `slug` and composes its preview document.
///
/// This never surfaces a blank screen: an unknown slug yields the not-found
/// document and a storage failure yields the fetch-error document, with the
/// underlying error logged. Fetch failures short-circuit here and are never
/// fed into [`compose_document`] as content.
pub async fn render_site_preview(db: &DatabaseConnection, slug: &str) -> String {
    let site = match crate::core::site::get_site_by_slug(db, slug).await {
        Ok(Some(site)) => site,
        Ok(None) => {
            info!(slug, "preview requested for unknown slug");
            return site_not_found_document();
        }
        Err(e) => {
            error!(slug, "failed to load site for preview: {e}");
            return fetch_error_document("Failed to load site data.");
        }
    };

    match crate::core::file::file_map(db, site.id).await {
        Ok(files) => compose_document(&files, &site.site_name),
        Err(e) => {
            error!(slug, site_id = site.id, "failed to load site files for preview: {e}");
            fetch_error_document("Failed to load site files.")
        }
    }
}

/// Fetches a site's files and composes the preview, surfacing storage errors.
///
/// Unlike [`render_site_preview`] this takes an already-resolved site id and
/// lets the caller decide how to present failures.
pub async fn preview_for_site(db: &DatabaseConnection, site_id: i64, title: &str) -> Result<String> {
    let files = crate::core::file::file_map(db, site_id).await?;
    Ok(compose_document(&files, title))
}
