//! Site entity - A hosted static site owned by one user.
//!
//! The `public_link_slug` is the shareable, URL-safe address of the site and
//! is immutable after creation; the internal id never leaves the dashboard.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hosted site database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hosted_sites")]
pub struct Model {
    /// Unique identifier for the site
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// Human-readable site name, free text
    pub site_name: String,
    /// Unique URL-safe public address, fixed at creation
    #[sea_orm(unique)]
    pub public_link_slug: String,
    /// Lifecycle status, `"active"` for every site this version creates
    pub status: String,
    /// When the site was created
    pub created_at: DateTimeUtc,
    /// When the site row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Site and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each site belongs to one profile
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id"
    )]
    Profile,
    /// One site has many source files
    #[sea_orm(has_many = "super::site_file::Entity")]
    Files,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::site_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
