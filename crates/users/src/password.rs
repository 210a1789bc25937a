use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;
use std::sync::LazyLock;

// Verified against when the email is unknown, so that path costs one Argon2 run too.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| match hash("not-a-real-password") {
    Ok(stored) => Some(stored),
    Err(e) => {
        tracing::error!("Failed to build dummy password hash: {}", e);
        None
    }
});

pub(crate) fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// False for a wrong password and for a stored hash that does not parse.
pub(crate) fn verify(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Burns the same work as `verify` and always answers false.
pub(crate) fn verify_dummy(password: &str) -> bool {
    if let Some(stored) = DUMMY_HASH.as_deref() {
        let _ = verify(password, stored);
    }
    false
}
