use thiserror::Error;

/// Unified error type for the QuickHost / Boongle Mail core.
///
/// Validation variants are raised before any database write; `Database`
/// covers everything surfaced by the storage backend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("No profile found for user '{user_id}'")]
    ProfileNotFound { user_id: String },

    #[error("No site found for '{slug}'")]
    SiteNotFound { slug: String },

    #[error("Site file '{name}' not found")]
    FileNotFound { name: String },

    #[error("Site name cannot be empty")]
    EmptySiteName,

    #[error("Invalid file name '{name}': must end with .html, .css, or .js")]
    InvalidFileName { name: String },

    #[error("File '{name}' already exists for this site")]
    DuplicateFileName { name: String },

    #[error("'{name}' is a default file and cannot be deleted")]
    ReservedFileName { name: String },

    #[error("Insufficient credits: have {balance}, need {required}")]
    InsufficientCredits { balance: i64, required: i64 },

    #[error("Invalid mail username '{localpart}': only a-z, 0-9, '.', '_' and '-' are allowed")]
    InvalidLocalpart { localpart: String },

    #[error("Recipient '{address}' is not a valid @boongle.com address")]
    InvalidRecipient { address: String },

    #[error("Address '{address}' is already taken")]
    DuplicateAddress { address: String },

    #[error("Mail identity limit reached: {count} identities already exist")]
    IdentityLimitReached { count: u64 },

    #[error("Mail identity '{id}' not found")]
    IdentityNotFound { id: String },

    #[error("No mail identity exists for address '{address}'")]
    RecipientNotFound { address: String },

    #[error("Mailbox entry '{id}' not found")]
    MailboxEntryNotFound { id: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
