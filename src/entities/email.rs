//! Email entity - An immutable message, written once at send time.
//!
//! Per-recipient state (folder, read flag) lives on the mailbox entries that
//! reference the email, never on the email itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Email database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "emails")]
pub struct Model {
    /// Unique identifier for the email
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full sender address
    pub sender_email_address: String,
    /// Full recipient address
    pub recipient_email_address: String,
    /// Subject line, may be empty
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// When the email was sent
    pub sent_at: DateTimeUtc,
}

/// Defines relationships between Email and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One email is referenced by one mailbox entry per participant
    #[sea_orm(has_many = "super::mailbox_entry::Entity")]
    MailboxEntries,
}

impl Related<super::mailbox_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailboxEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
