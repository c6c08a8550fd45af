//! Shared test utilities for `QuickHost`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{mail, session, site},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a profile with a given starting balance.
pub async fn create_test_profile(
    db: &DatabaseConnection,
    user_id: &str,
    credits: i64,
) -> Result<entities::profile::Model> {
    let profile = session::create_profile(db, user_id).await?;
    if credits > 0 {
        session::persist_balance(db, user_id, credits).await?;
    }
    Ok(entities::profile::Model { credits, ..profile })
}

/// Creates a profile with the given balance and signs it in.
pub async fn signed_in_session(
    db: &DatabaseConnection,
    user_id: &str,
    credits: i64,
) -> Result<session::Session> {
    create_test_profile(db, user_id, credits).await?;
    session::Session::sign_in(db.clone(), user_id).await
}

/// Sets up a database, a signed-in session holding enough credits for one
/// more site, and one freshly created site named "Test Site" with its
/// seeded default files.
pub async fn setup_with_site(
) -> Result<(DatabaseConnection, session::Session, entities::site::Model)> {
    let db = setup_test_db().await?;
    let session = signed_in_session(&db, "user-1", site::NEW_SITE_COST * 2).await?;
    let created = site::create_site(&db, &session, "Test Site").await?;
    Ok((db, session, created))
}

/// Creates a mail identity with the display name defaulted.
pub async fn create_test_identity(
    db: &DatabaseConnection,
    user_id: &str,
    localpart: &str,
) -> Result<entities::mail_identity::Model> {
    mail::create_identity(db, user_id, localpart, None).await
}

/// Sets up a database with two users holding the identities
/// `alice@boongle.com` and `bob@boongle.com`.
pub async fn setup_with_two_identities() -> Result<(
    DatabaseConnection,
    entities::mail_identity::Model,
    entities::mail_identity::Model,
)> {
    let db = setup_test_db().await?;
    create_test_profile(&db, "user-alice", 0).await?;
    create_test_profile(&db, "user-bob", 0).await?;
    let alice = create_test_identity(&db, "user-alice", "alice").await?;
    let bob = create_test_identity(&db, "user-bob", "bob").await?;
    Ok((db, alice, bob))
}
