//! Mailbox entry entity - Associates one immutable email with one identity
//! and folder, carrying the per-recipient read flag.
//!
//! Sending an email produces two rows: the sender's `sent` entry and the
//! recipient's unread `inbox` entry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mailbox entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mailbox_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the referenced email
    pub email_id: i64,
    /// ID of the identity this entry belongs to
    pub identity_id: i64,
    /// Folder name: `"inbox"`, `"sent"`, `"trash"` or `"archive"`
    pub folder: String,
    /// Whether the owning identity has opened the email
    pub is_read: bool,
    /// When the entry was associated with the identity
    pub associated_at: DateTimeUtc,
}

/// Defines relationships between `MailboxEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry references one immutable email
    #[sea_orm(
        belongs_to = "super::email::Entity",
        from = "Column::EmailId",
        to = "super::email::Column::Id"
    )]
    Email,
    /// Each entry belongs to one mail identity
    #[sea_orm(
        belongs_to = "super::mail_identity::Entity",
        from = "Column::IdentityId",
        to = "super::mail_identity::Column::Id"
    )]
    Identity,
}

impl Related<super::email::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Email.def()
    }
}

impl Related<super::mail_identity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
