//! Password digests.
//!
//! A digest is the lowercase hex SHA-256 of the password bytes. There is no
//! salt, so the same password always maps to the same digest. Registration
//! stores it and sign-in compares against it.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_LEN: usize = 64;

/// Hash a password into the value stored in `users.password_hash`.
#[must_use]
pub fn digest(password: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}
