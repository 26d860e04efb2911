//! Credential Verifier
//!
//! Pure argon2 hashing and verification. Digests are salted and
//! non-reversible; `verify(s, hash(s))` always holds.

/// Documented default secret for the master-admin bootstrap paths.
///
/// Only ever hashed locally; never transmitted. Applies solely to the
/// master admin role (first-run provisioning and the offline hash
/// bootstrap after a remote login).
pub const DEFAULT_ADMIN_SECRET: &str = "1234";

/// Hash a plaintext secret using argon2
pub fn hash(secret: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let digest = argon2.hash_password(secret.as_bytes(), &salt)?;
    Ok(digest.to_string())
}

/// Verify a plaintext secret against a stored digest
pub fn verify(secret: &str, digest: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed = PasswordHash::new(digest)?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}
