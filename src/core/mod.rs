//! Core business logic - framework-agnostic operations over the data store.
//! Each submodule owns one concern; functions take a database connection and
//! return `crate::errors::Result`.

/// Site file management: creation, saving, deletion, lookup
pub mod file;
/// Boongle Mail: identities, sending, mailboxes, read state
pub mod mail;
/// Change notification for mailbox inserts
pub mod notify;
/// Site preview composition and its fallback documents
pub mod preview;
/// Session state and the credit-accrual ticker
pub mod session;
/// Hosted site lifecycle: creation, lookup, deletion
pub mod site;
