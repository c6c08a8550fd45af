//! Hosted site lifecycle.
//!
//! Creating a site costs a fixed number of credits and seeds the three
//! default files. The site row and its files are written in one database
//! transaction, so a half-created site can never exist; the credit debit
//! happens afterwards through the session, and a failed debit rolls the
//! whole site back. Deletion never refunds credits.

use crate::{
    config::templates,
    core::session::Session,
    entities::{Site, SiteFile, site, site_file},
    errors::{Error, Result},
};
use rand::{Rng, distr::Alphanumeric};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{error, info, warn};

/// Credits debited when a new site is created
pub const NEW_SITE_COST: i64 = 5;

const SLUG_SUFFIX_LEN: usize = 6;

/// Derives a public slug from a site name: lowercased, whitespace collapsed
/// to hyphens, everything outside `[a-z0-9-]` dropped, plus a random
/// alphanumeric suffix so equal names never collide.
#[must_use]
pub fn generate_slug(name: &str) -> String {
    let base: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(SLUG_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();

    format!("{base}-{suffix}")
}

/// Creates a site for the signed-in user, seeding the default files and
/// debiting [`NEW_SITE_COST`] credits.
///
/// The credit guard runs against the session's local balance before any row
/// is written. The site and its default files are inserted atomically; if
/// the subsequent debit fails to persist, the site is deleted again and the
/// debit error surfaces to the caller.
///
/// # Errors
/// [`Error::EmptySiteName`], [`Error::InsufficientCredits`], or a database
/// failure.
pub async fn create_site(
    db: &DatabaseConnection,
    session: &Session,
    name: &str,
) -> Result<site::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptySiteName);
    }

    let balance = session.credits();
    if balance < NEW_SITE_COST {
        return Err(Error::InsufficientCredits {
            balance,
            required: NEW_SITE_COST,
        });
    }

    let now = chrono::Utc::now();
    let txn = db.begin().await?;

    let new_site = site::ActiveModel {
        user_id: Set(session.user_id().to_string()),
        site_name: Set(name.to_string()),
        public_link_slug: Set(generate_slug(name)),
        status: Set("active".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_site.insert(&txn).await?;

    for template in templates::default_templates() {
        let file = site_file::ActiveModel {
            site_id: Set(created.id),
            file_name: Set(template.file_name),
            content: Set(template.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        file.insert(&txn).await?;
    }

    txn.commit().await?;

    // The rows exist; now charge for them. A failed debit compensates by
    // removing the site again, default files included.
    if let Err(debit_error) = session.debit(NEW_SITE_COST).await {
        warn!(
            site_id = created.id,
            "credit debit failed, rolling back site creation: {debit_error}"
        );
        if let Err(cleanup_error) = delete_site(db, created.id).await {
            error!(
                site_id = created.id,
                "failed to clean up site after debit failure: {cleanup_error}"
            );
        }
        return Err(debit_error);
    }

    info!(
        site_id = created.id,
        slug = %created.public_link_slug,
        "site created"
    );
    Ok(created)
}

/// Finds a site by its public slug. This is the public read path: no owner
/// check, anyone holding the slug may view the site.
pub async fn get_site_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<site::Model>> {
    Site::find()
        .filter(site::Column::PublicLinkSlug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a site by its internal id.
pub async fn get_site_by_id(db: &DatabaseConnection, site_id: i64) -> Result<Option<site::Model>> {
    Site::find_by_id(site_id).one(db).await.map_err(Into::into)
}

/// Lists a user's sites, newest first.
pub async fn get_sites_for_user(db: &DatabaseConnection, user_id: &str) -> Result<Vec<site::Model>> {
    Site::find()
        .filter(site::Column::UserId.eq(user_id))
        .order_by_desc(site::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a site and all of its files. Credits are not refunded.
///
/// # Errors
/// [`Error::SiteNotFound`] if no such site exists.
pub async fn delete_site(db: &DatabaseConnection, site_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    SiteFile::delete_many()
        .filter(site_file::Column::SiteId.eq(site_id))
        .exec(&txn)
        .await?;

    let result = Site::delete_by_id(site_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::SiteNotFound {
            slug: site_id.to_string(),
        });
    }

    txn.commit().await?;
    info!(site_id, "site deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::session;
    use crate::test_utils::*;

    #[test]
    fn test_generate_slug_shape() {
        let slug = generate_slug("My Awesome Project!");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "my-awesome-project");
        assert_eq!(suffix.len(), 6);
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        );
    }

    #[test]
    fn test_generate_slug_unique_for_equal_names() {
        assert_ne!(generate_slug("blog"), generate_slug("blog"));
    }

    #[tokio::test]
    async fn test_create_site_requires_name() -> Result<()> {
        let db = setup_test_db().await?;
        let session = signed_in_session(&db, "user-1", 10).await?;

        let result = create_site(&db, &session, "   ").await;
        assert!(matches!(result.unwrap_err(), Error::EmptySiteName));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_site_guard_rejects_before_any_write() -> Result<()> {
        let db = setup_test_db().await?;
        let session = signed_in_session(&db, "user-1", NEW_SITE_COST - 1).await?;

        let result = create_site(&db, &session, "Broke Site").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientCredits { balance: 4, required: NEW_SITE_COST }
        ));

        // No site row, no file rows, balance untouched.
        assert!(get_sites_for_user(&db, "user-1").await?.is_empty());
        assert_eq!(SiteFile::find().all(&db).await?.len(), 0);
        assert_eq!(session.credits(), NEW_SITE_COST - 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_site_seeds_defaults_and_debits() -> Result<()> {
        let db = setup_test_db().await?;
        let session = signed_in_session(&db, "user-1", 8).await?;

        let created = create_site(&db, &session, "My Blog").await?;
        assert_eq!(created.site_name, "My Blog");
        assert_eq!(created.status, "active");
        assert!(created.public_link_slug.starts_with("my-blog-"));

        let file_names: Vec<String> = crate::core::file::get_files_for_site(&db, created.id)
            .await?
            .into_iter()
            .map(|f| f.file_name)
            .collect();
        assert_eq!(file_names, vec!["index.html", "script.js", "styles.css"]);

        assert_eq!(session.credits(), 3);
        let profile = session::get_profile(&db, "user-1").await?.unwrap();
        assert_eq!(profile.credits, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_site_rolls_back_when_debit_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let session = signed_in_session(&db, "user-1", 10).await?;

        // Make the debit's write-through fail while the local balance is
        // still sufficient.
        crate::entities::Profile::delete_by_id("user-1".to_string())
            .exec(&db)
            .await?;

        let result = create_site(&db, &session, "Doomed Site").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProfileNotFound { user_id: _ }
        ));

        // Compensation removed the site and its files; the local balance
        // was restored.
        assert!(get_sites_for_user(&db, "user-1").await?.is_empty());
        assert_eq!(SiteFile::find().all(&db).await?.len(), 0);
        assert_eq!(session.credits(), 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_accrue_then_create_scenario() -> Result<()> {
        let db = setup_test_db().await?;

        // New signup starts at zero.
        session::create_profile(&db, "user-1").await?;
        let session = session::Session::sign_in(db.clone(), "user-1").await?;
        assert_eq!(session.credits(), 0);

        // Two ticks in: still short of the site cost.
        session.tick();
        session.tick();
        assert_eq!(session.credits(), 2);
        let early = create_site(&db, &session, "Too Early").await;
        assert!(matches!(
            early.unwrap_err(),
            Error::InsufficientCredits { balance: 2, required: NEW_SITE_COST }
        ));

        // Keep accruing until the balance covers the cost.
        while session.credits() < NEW_SITE_COST {
            session.tick();
        }

        let created = create_site(&db, &session, "Finally").await?;
        assert_eq!(session.credits(), 0);
        let files = crate::core::file::get_files_for_site(&db, created.id).await?;
        assert_eq!(files.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_site_by_slug_public_read() -> Result<()> {
        let (db, _session, created) = setup_with_site().await?;

        let found = get_site_by_slug(&db, &created.public_link_slug).await?;
        assert_eq!(found.unwrap().id, created.id);

        let missing = get_site_by_slug(&db, "not-a-slug").await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_site_removes_files_without_refund() -> Result<()> {
        let (db, session, created) = setup_with_site().await?;
        let balance_before = session.credits();

        delete_site(&db, created.id).await?;

        assert!(get_site_by_id(&db, created.id).await?.is_none());
        assert_eq!(SiteFile::find().all(&db).await?.len(), 0);
        assert_eq!(session.credits(), balance_before);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_site() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_site(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::SiteNotFound { slug: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_sites_listed_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let session = signed_in_session(&db, "user-1", 20).await?;

        let first = create_site(&db, &session, "First").await?;
        let second = create_site(&db, &session, "Second").await?;

        let sites = get_sites_for_user(&db, "user-1").await?;
        assert_eq!(sites.len(), 2);
        // Equal timestamps are possible at this resolution; ids break the tie.
        assert!(sites.iter().any(|s| s.id == first.id));
        assert_eq!(sites.iter().map(|s| s.id).max(), Some(second.id));

        Ok(())
    }
}
