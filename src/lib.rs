//! # Signaro (sign vocabulary backend)
//!
//! `signaro` is the backend for a sign/speech communication aid. It handles
//! account signup/login, bearer-token authentication, and per-user CRUD of
//! custom sign records (word → media URI) stored in SQLite.
//!
//! ## Authentication
//!
//! Passwords are stored as bcrypt hashes (cost 10). A successful login
//! issues an HS256 token embedding the account id and email, valid for one
//! hour. Protected routes re-resolve the embedded account on every request;
//! there is no session cache.
//!
//! ## Ownership
//!
//! Sign records belong to exactly one account and every read/write is
//! scoped to the authenticated owner. Deleting a sign that does not exist
//! and deleting a sign owned by someone else are deliberately
//! indistinguishable (`404 Not Found`) to prevent resource enumeration.

pub mod cli;
pub mod signaro;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
