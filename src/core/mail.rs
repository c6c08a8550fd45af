//! Boongle Mail business logic.
//!
//! Identities are `localpart@boongle.com` addresses, at most three per user;
//! the oldest is the implicit primary. Sending an email writes the immutable
//! email row plus two mailbox entries (sender's `sent`, recipient's unread
//! `inbox`) in one database transaction, then announces both rows through
//! the [`MailboxNotifier`]. Addressing is validated before any write; the
//! database is the authority on address uniqueness.

use crate::{
    core::notify::{MailboxEvent, MailboxNotifier},
    entities::{Email, MailIdentity, MailboxEntry, email, mail_identity, mailbox_entry},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Domain every Boongle address lives under
pub const MAIL_DOMAIN: &str = "boongle.com";

/// Maximum number of identities one user may hold
pub const MAX_IDENTITIES: u64 = 3;

/// Mailbox folder names. Only `Inbox` and `Sent` are populated today;
/// `Trash` and `Archive` exist in the schema for later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MailFolder {
    Inbox,
    Sent,
    Trash,
    Archive,
}

impl MailFolder {
    /// The folder name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Sent => "sent",
            Self::Trash => "trash",
            Self::Archive => "archive",
        }
    }
}

/// Whether a localpart is acceptable: non-empty, `[a-z0-9._-]` only.
#[must_use]
pub fn is_valid_localpart(localpart: &str) -> bool {
    !localpart.is_empty()
        && localpart
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

/// Splits a full address into its localpart if it belongs to the Boongle
/// domain and the localpart is well-formed.
#[must_use]
pub fn boongle_localpart(address: &str) -> Option<&str> {
    let (localpart, domain) = address.rsplit_once('@')?;
    (domain == MAIL_DOMAIN && is_valid_localpart(localpart)).then_some(localpart)
}

/// Creates a new mail identity for a user.
///
/// The localpart is validated and the per-user cap checked before any
/// write. The display name defaults to the localpart.
///
/// # Errors
/// [`Error::InvalidLocalpart`], [`Error::IdentityLimitReached`] or
/// [`Error::DuplicateAddress`].
pub async fn create_identity(
    db: &DatabaseConnection,
    user_id: &str,
    localpart: &str,
    display_name: Option<String>,
) -> Result<mail_identity::Model> {
    let localpart = localpart.trim();
    if !is_valid_localpart(localpart) {
        return Err(Error::InvalidLocalpart {
            localpart: localpart.to_string(),
        });
    }

    let count = MailIdentity::find()
        .filter(mail_identity::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if count >= MAX_IDENTITIES {
        return Err(Error::IdentityLimitReached { count });
    }

    let address = format!("{localpart}@{MAIL_DOMAIN}");
    let taken = get_identity_by_address(db, &address).await?;
    if taken.is_some() {
        return Err(Error::DuplicateAddress { address });
    }

    let identity = mail_identity::ActiveModel {
        user_id: Set(user_id.to_string()),
        email_address: Set(address),
        display_name: Set(Some(
            display_name.unwrap_or_else(|| localpart.to_string()),
        )),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = identity.insert(db).await?;
    info!(user_id, address = %created.email_address, "mail identity created");
    Ok(created)
}

/// Lists a user's identities, oldest first. The first entry is the
/// session's implicit primary identity.
pub async fn identities_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<mail_identity::Model>> {
    MailIdentity::find()
        .filter(mail_identity::Column::UserId.eq(user_id))
        .order_by_asc(mail_identity::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The user's primary identity: the one created first, if any.
pub async fn primary_identity(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<mail_identity::Model>> {
    MailIdentity::find()
        .filter(mail_identity::Column::UserId.eq(user_id))
        .order_by_asc(mail_identity::Column::CreatedAt)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an identity by its unique id.
pub async fn get_identity_by_id(
    db: &DatabaseConnection,
    identity_id: i64,
) -> Result<Option<mail_identity::Model>> {
    MailIdentity::find_by_id(identity_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an identity by its full address.
pub async fn get_identity_by_address(
    db: &DatabaseConnection,
    address: &str,
) -> Result<Option<mail_identity::Model>> {
    MailIdentity::find()
        .filter(mail_identity::Column::EmailAddress.eq(address))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sends an email from one identity to a Boongle address.
///
/// One transaction writes the immutable email, the sender's `sent` entry
/// and the recipient's unread `inbox` entry, so the two mailbox views can
/// never disagree about whether the mail exists. Both new rows are
/// announced through the notifier after the commit.
///
/// # Errors
/// [`Error::InvalidRecipient`] for a non-Boongle or malformed address,
/// [`Error::IdentityNotFound`] for an unknown sender,
/// [`Error::RecipientNotFound`] when no identity holds the address.
pub async fn send_email(
    db: &DatabaseConnection,
    notifier: &MailboxNotifier,
    sender_identity_id: i64,
    recipient_address: &str,
    subject: &str,
    body: &str,
) -> Result<email::Model> {
    if boongle_localpart(recipient_address).is_none() {
        return Err(Error::InvalidRecipient {
            address: recipient_address.to_string(),
        });
    }

    let txn = db.begin().await?;

    let sender = MailIdentity::find_by_id(sender_identity_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::IdentityNotFound {
            id: sender_identity_id.to_string(),
        })?;

    let recipient = MailIdentity::find()
        .filter(mail_identity::Column::EmailAddress.eq(recipient_address))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::RecipientNotFound {
            address: recipient_address.to_string(),
        })?;

    let now = chrono::Utc::now();
    let sent_email = email::ActiveModel {
        sender_email_address: Set(sender.email_address.clone()),
        recipient_email_address: Set(recipient.email_address.clone()),
        subject: Set(subject.to_string()),
        body: Set(body.to_string()),
        sent_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let sent_entry = mailbox_entry::ActiveModel {
        email_id: Set(sent_email.id),
        identity_id: Set(sender.id),
        folder: Set(MailFolder::Sent.as_str().to_string()),
        // Read state is irrelevant for one's own sent mail.
        is_read: Set(true),
        associated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let inbox_entry = mailbox_entry::ActiveModel {
        email_id: Set(sent_email.id),
        identity_id: Set(recipient.id),
        folder: Set(MailFolder::Inbox.as_str().to_string()),
        is_read: Set(false),
        associated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    notifier.publish(MailboxEvent {
        mailbox_id: sent_entry.id,
        email_id: sent_email.id,
        identity_id: sender.id,
        folder: MailFolder::Sent,
    });
    notifier.publish(MailboxEvent {
        mailbox_id: inbox_entry.id,
        email_id: sent_email.id,
        identity_id: recipient.id,
        folder: MailFolder::Inbox,
    });

    info!(
        email_id = sent_email.id,
        from = %sent_email.sender_email_address,
        to = %sent_email.recipient_email_address,
        "email sent"
    );
    Ok(sent_email)
}

/// Lists one folder of one identity's mailbox, newest first, each entry
/// joined with its email.
pub async fn list_mailbox(
    db: &DatabaseConnection,
    identity_id: i64,
    folder: MailFolder,
) -> Result<Vec<(mailbox_entry::Model, email::Model)>> {
    let rows = MailboxEntry::find()
        .filter(mailbox_entry::Column::IdentityId.eq(identity_id))
        .filter(mailbox_entry::Column::Folder.eq(folder.as_str()))
        .order_by_desc(mailbox_entry::Column::AssociatedAt)
        .find_also_related(Email)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(entry, maybe_email)| match maybe_email {
            Some(mail) => Some((entry, mail)),
            None => {
                warn!(entry_id = entry.id, "mailbox entry without email, skipping");
                None
            }
        })
        .collect())
}

/// Marks a mailbox entry as read. Called when the owning identity opens
/// the email; the flag persists across reloads.
///
/// # Errors
/// [`Error::MailboxEntryNotFound`] if the entry does not exist.
pub async fn mark_read(db: &DatabaseConnection, entry_id: i64) -> Result<mailbox_entry::Model> {
    let entry = MailboxEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::MailboxEntryNotFound {
            id: entry_id.to_string(),
        })?;

    let mut active: mailbox_entry::ActiveModel = entry.into();
    active.is_read = Set(true);

    let updated = active.update(db).await?;
    Ok(updated)
}

/// Number of unread inbox entries for an identity.
pub async fn unread_count(db: &DatabaseConnection, identity_id: i64) -> Result<u64> {
    MailboxEntry::find()
        .filter(mailbox_entry::Column::IdentityId.eq(identity_id))
        .filter(mailbox_entry::Column::Folder.eq(MailFolder::Inbox.as_str()))
        .filter(mailbox_entry::Column::IsRead.eq(false))
        .count(db)
        .await
        .map_err(Into::into)
}
