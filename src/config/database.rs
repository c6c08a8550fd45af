//! Database configuration module for the QuickHost core.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Table creation uses `Schema::create_table_from_entity` so the schema is generated
//! from the entity definitions, keeping the database in lockstep with the Rust structs
//! without any hand-written SQL. Tables are created in dependency order because the
//! generated schema carries foreign keys for the `belongs_to` relations.

use crate::entities::{Email, MailIdentity, MailboxEntry, Profile, Site, SiteFile};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/quickhost.sqlite".to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Profiles come first, then sites and their files, then the mail tables,
/// matching the direction of the foreign keys.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let profile_table = schema.create_table_from_entity(Profile);
    let site_table = schema.create_table_from_entity(Site);
    let site_file_table = schema.create_table_from_entity(SiteFile);
    let mail_identity_table = schema.create_table_from_entity(MailIdentity);
    let email_table = schema.create_table_from_entity(Email);
    let mailbox_entry_table = schema.create_table_from_entity(MailboxEntry);

    db.execute(builder.build(&profile_table)).await?;
    db.execute(builder.build(&site_table)).await?;
    db.execute(builder.build(&site_file_table)).await?;
    db.execute(builder.build(&mail_identity_table)).await?;
    db.execute(builder.build(&email_table)).await?;
    db.execute(builder.build(&mailbox_entry_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        email::Model as EmailModel, mail_identity::Model as MailIdentityModel,
        mailbox_entry::Model as MailboxEntryModel, profile::Model as ProfileModel,
        site::Model as SiteModel, site_file::Model as SiteFileModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Each table exists if a query against it succeeds
        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;
        let _: Vec<SiteModel> = Site::find().limit(1).all(&db).await?;
        let _: Vec<SiteFileModel> = SiteFile::find().limit(1).all(&db).await?;
        let _: Vec<MailIdentityModel> = MailIdentity::find().limit(1).all(&db).await?;
        let _: Vec<EmailModel> = Email::find().limit(1).all(&db).await?;
        let _: Vec<MailboxEntryModel> = MailboxEntry::find().limit(1).all(&db).await?;

        Ok(())
    }
}
