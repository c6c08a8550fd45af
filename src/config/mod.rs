/// Database configuration and connection management
pub mod database;

/// Default site file templates seeded at site creation
pub mod templates;
