//! Password hashing and session tokens
//!
//! Passwords are stored as `salt$digest` where digest is the SHA-256 of
//! salt bytes followed by the password. Session tokens are random v4
//! UUIDs; possession of the token is the whole credential.

use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const SALT_BYTES: usize = 16;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, password);
    format!("{}${}", hex::encode(salt), digest)
}

/// Check a password against a stored `salt$digest` string
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest_with_salt(&salt, password) == digest
}

/// Generate a fresh session token
pub fn new_session_token() -> String {
    Uuid::new_v4().to_string()
}

fn digest_with_salt(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
