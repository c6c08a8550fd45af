//! Site file management.
//!
//! Validation happens before any write: names must carry a known extension
//! and be unique within their site, and the seeded default files cannot be
//! deleted. Saves are last-write-wins with no concurrency token; the site
//! has a single editor, so concurrent saves of the same file are an
//! accepted race.

use crate::{
    config::templates::RESERVED_FILE_NAMES,
    entities::{SiteFile, site_file},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Whether a file name carries one of the hostable extensions.
#[must_use]
pub fn is_valid_file_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".css") || lower.ends_with(".js")
}

/// Creates an empty-ish file for a site, seeded with a placeholder comment.
///
/// # Errors
/// [`Error::InvalidFileName`] for a missing or unknown extension,
/// [`Error::DuplicateFileName`] if the site already has a file of that name.
pub async fn create_file(
    db: &DatabaseConnection,
    site_id: i64,
    name: &str,
) -> Result<site_file::Model> {
    let name = name.trim();
    if name.is_empty() || !is_valid_file_name(name) {
        return Err(Error::InvalidFileName {
            name: name.to_string(),
        });
    }

    let existing = SiteFile::find()
        .filter(site_file::Column::SiteId.eq(site_id))
        .filter(site_file::Column::FileName.eq(name))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateFileName {
            name: name.to_string(),
        });
    }

    let now = chrono::Utc::now();
    let file = site_file::ActiveModel {
        site_id: Set(site_id),
        file_name: Set(name.to_string()),
        content: Set(format!("// New file: {name}")),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = file.insert(db).await?;
    info!(site_id, file_name = %created.file_name, "site file created");
    Ok(created)
}

/// Saves new content for a file. Last write wins.
///
/// # Errors
/// [`Error::FileNotFound`] if the file does not exist.
pub async fn save_file(
    db: &DatabaseConnection,
    file_id: i64,
    content: String,
) -> Result<site_file::Model> {
    let file = SiteFile::find_by_id(file_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::FileNotFound {
            name: file_id.to_string(),
        })?;

    let mut active: site_file::ActiveModel = file.into();
    active.content = Set(content);
    active.updated_at = Set(chrono::Utc::now());

    let saved = active.update(db).await?;
    Ok(saved)
}

/// Deletes a file unless it is one of the seeded defaults.
///
/// # Errors
/// [`Error::FileNotFound`] if the file does not exist,
/// [`Error::ReservedFileName`] for the seeded defaults.
pub async fn delete_file(db: &DatabaseConnection, file_id: i64) -> Result<()> {
    let file = SiteFile::find_by_id(file_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::FileNotFound {
            name: file_id.to_string(),
        })?;

    if RESERVED_FILE_NAMES.contains(&file.file_name.as_str()) {
        return Err(Error::ReservedFileName {
            name: file.file_name,
        });
    }

    info!(file_id, file_name = %file.file_name, "site file deleted");
    file.delete(db).await?;
    Ok(())
}

/// Lists a site's files, ordered by name for a stable editor listing.
pub async fn get_files_for_site(
    db: &DatabaseConnection,
    site_id: i64,
) -> Result<Vec<site_file::Model>> {
    SiteFile::find()
        .filter(site_file::Column::SiteId.eq(site_id))
        .order_by_asc(site_file::Column::FileName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a site's files as a name-to-content map for the preview composer.
pub async fn file_map(db: &DatabaseConnection, site_id: i64) -> Result<HashMap<String, String>> {
    let files = get_files_for_site(db, site_id).await?;
    Ok(files
        .into_iter()
        .map(|file| (file.file_name, file.content))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_file_name_validation() {
        assert!(is_valid_file_name("about.html"));
        assert!(is_valid_file_name("theme.CSS"));
        assert!(is_valid_file_name("app.js"));
        assert!(!is_valid_file_name("notes.txt"));
        assert!(!is_valid_file_name("script"));
        assert!(!is_valid_file_name(""));
    }

    #[tokio::test]
    async fn test_create_file_rejects_bad_extension() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;

        let result = create_file(&db, site.id, "readme.md").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidFileName { name: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_file_rejects_duplicate_name() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;

        // index.html was seeded at site creation.
        let result = create_file(&db, site.id, "index.html").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateFileName { name: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_file_seeds_placeholder() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;

        let file = create_file(&db, site.id, "about.html").await?;
        assert_eq!(file.file_name, "about.html");
        assert_eq!(file.content, "// New file: about.html");

        Ok(())
    }

    #[tokio::test]
    async fn test_save_file_last_write_wins() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;
        let file = create_file(&db, site.id, "about.html").await?;

        save_file(&db, file.id, "<p>first</p>".to_string()).await?;
        let saved = save_file(&db, file.id, "<p>second</p>".to_string()).await?;
        assert_eq!(saved.content, "<p>second</p>");

        let reloaded = SiteFile::find_by_id(file.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.content, "<p>second</p>");

        Ok(())
    }

    #[tokio::test]
    async fn test_save_unknown_file() -> Result<()> {
        let db = setup_test_db().await?;

        let result = save_file(&db, 999, String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::FileNotFound { name: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_reserved_file_is_rejected() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;
        let files = get_files_for_site(&db, site.id).await?;
        let index = files.iter().find(|f| f.file_name == "index.html").unwrap();

        let result = delete_file(&db, index.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ReservedFileName { name: _ }
        ));

        // Still present.
        assert!(SiteFile::find_by_id(index.id).one(&db).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_custom_file() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;
        let file = create_file(&db, site.id, "extra.js").await?;

        delete_file(&db, file.id).await?;
        assert!(SiteFile::find_by_id(file.id).one(&db).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_file_map_contents() -> Result<()> {
        let (db, _session, site) = setup_with_site().await?;

        let map = file_map(&db, site.id).await?;
        assert_eq!(map.len(), 3);
        assert!(map.contains_key("index.html"));
        assert!(map.contains_key("styles.css"));
        assert!(map.contains_key("script.js"));

        Ok(())
    }
}
