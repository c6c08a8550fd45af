//! Site file entity - One named source file belonging to a hosted site.
//!
//! File names are unique within a site. The reserved defaults (`index.html`,
//! `styles.css`, `script.js`) are seeded at site creation and may not be
//! deleted; that rule lives in the core layer, not in a table constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site file database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_files")]
pub struct Model {
    /// Unique identifier for the file
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the site this file belongs to
    pub site_id: i64,
    /// File name including extension, unique per site
    pub file_name: String,
    /// Raw text content
    pub content: String,
    /// When the file was created
    pub created_at: DateTimeUtc,
    /// When the content was last saved
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `SiteFile` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each file belongs to one site
    #[sea_orm(
        belongs_to = "super::site::Entity",
        from = "Column::SiteId",
        to = "super::site::Column::Id"
    )]
    Site,
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
