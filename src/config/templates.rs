//! Default site file templates.
//!
//! Every new site is seeded with three files: `index.html`, `styles.css` and
//! `script.js`. The built-in templates below are used unless an operator
//! supplies replacements in a TOML file. The three names are reserved: the
//! file manager refuses to delete them.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// File names seeded at site creation that may never be deleted
pub const RESERVED_FILE_NAMES: [&str; 3] = ["index.html", "styles.css", "script.js"];

/// Configuration structure for a template override file
#[derive(Debug, Deserialize)]
pub struct TemplatesConfig {
    /// Templates seeded into every new site
    pub site_templates: Vec<SiteTemplate>,
}

/// One named file template
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteTemplate {
    /// File name including extension
    pub file_name: String,
    /// Initial file content
    pub content: String,
}

const DEFAULT_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My QuickHost Site</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body>
    <main>
        <h1>Hello from QuickHost!</h1>
        <p>Edit index.html, styles.css and script.js to build your site.</p>
        <button id="hello">Say hello</button>
    </main>
    <script src="script.js"></script>
</body>
</html>
"#;

const DEFAULT_STYLES_CSS: &str = "body {
    font-family: sans-serif;
    margin: 0;
    line-height: 1.6;
}

main {
    max-width: 720px;
    margin: 0 auto;
    padding: 2rem;
    text-align: center;
}
";

const DEFAULT_SCRIPT_JS: &str = "document.addEventListener('DOMContentLoaded', () => {
    const button = document.getElementById('hello');
    if (button) {
        button.addEventListener('click', () => alert('Hello!'));
    }
});
";

/// Returns the built-in templates, one per reserved file name.
#[must_use]
pub fn default_templates() -> Vec<SiteTemplate> {
    vec![
        SiteTemplate {
            file_name: "index.html".to_string(),
            content: DEFAULT_INDEX_HTML.to_string(),
        },
        SiteTemplate {
            file_name: "styles.css".to_string(),
            content: DEFAULT_STYLES_CSS.to_string(),
        },
        SiteTemplate {
            file_name: "script.js".to_string(),
            content: DEFAULT_SCRIPT_JS.to_string(),
        },
    ]
}

/// Loads replacement templates from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_templates<P: AsRef<Path>>(path: P) -> Result<TemplatesConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read template file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse template file: {e}"),
    })
}
