//! Profile entity - Per-user account state owned by the auth subsystem.
//!
//! The primary key is the opaque user id issued at signup. Credits accrue
//! through the session ticker and are debited by site creation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Opaque user id from the auth subsystem
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Current credit balance, never negative
    pub credits: i64,
    /// When the balance was last written
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Profile and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One profile owns many hosted sites
    #[sea_orm(has_many = "super::site::Entity")]
    Sites,
    /// One profile holds up to three mail identities
    #[sea_orm(has_many = "super::mail_identity::Entity")]
    MailIdentities,
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sites.def()
    }
}

impl Related<super::mail_identity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailIdentities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
