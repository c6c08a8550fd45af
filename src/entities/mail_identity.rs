//! Mail identity entity - One `localpart@boongle.com` address held by a user.
//!
//! A user may hold up to three identities; the oldest one is the session's
//! implicit primary. Addresses are unique across the whole system.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mail identity database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mail_identities")]
pub struct Model {
    /// Unique identifier for the identity
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// Full address in the form `localpart@boongle.com`, unique
    #[sea_orm(unique)]
    pub email_address: String,
    /// Optional display name shown instead of the address
    pub display_name: Option<String>,
    /// When the identity was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `MailIdentity` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each identity belongs to one profile
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id"
    )]
    Profile,
    /// One identity has many mailbox entries
    #[sea_orm(has_many = "super::mailbox_entry::Entity")]
    MailboxEntries,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::mailbox_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailboxEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
