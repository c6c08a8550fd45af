//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod email;
pub mod mail_identity;
pub mod mailbox_entry;
pub mod profile;
pub mod site;
pub mod site_file;

// Re-export specific types to avoid conflicts
pub use email::{Column as EmailColumn, Entity as Email, Model as EmailModel};
pub use mail_identity::{
    Column as MailIdentityColumn, Entity as MailIdentity, Model as MailIdentityModel,
};
pub use mailbox_entry::{
    Column as MailboxEntryColumn, Entity as MailboxEntry, Model as MailboxEntryModel,
};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use site::{Column as SiteColumn, Entity as Site, Model as SiteModel};
pub use site_file::{Column as SiteFileColumn, Entity as SiteFile, Model as SiteFileModel};
