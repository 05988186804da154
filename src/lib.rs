//! # MindUWC (registration and sign-in)
//!
//! `minduwc` serves a small HTML front door: a home page, a sign-in form and a
//! registration form, backed by a single SQLite file.
//!
//! ## Accounts
//!
//! One table, `users(email, password_hash)`. The email column carries a
//! `UNIQUE` constraint, which is the only thing standing between two
//! registrations of the same address. Accounts are created once and never
//! updated or deleted.
//!
//! ## Credentials
//!
//! Passwords are reduced to an unsalted SHA-256 hex digest before they touch
//! storage; sign-in recomputes the digest and looks for a matching row. A wrong
//! password and an unknown email produce the same answer.
//!
//! ## Storage
//!
//! There is no pool. Each request that needs the database opens its own
//! connection on first use and drops it when the request finishes.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
