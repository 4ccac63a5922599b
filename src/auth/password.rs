use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}

/// How stored credentials are compared with what the user typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialPolicy {
    /// Rows that predate hashing hold the password itself. Comparing those is
    /// opt-in and logged every time it happens.
    pub allow_plaintext: bool,
}

impl CredentialPolicy {
    pub fn new(allow_plaintext: bool) -> Self {
        Self { allow_plaintext }
    }

    pub fn matches(&self, password: &str, stored: &str) -> bool {
        if PasswordHash::new(stored).is_ok() {
            return verify_password(password, stored).is_ok();
        }

        if self.allow_plaintext {
            warn!("Comparing against a plaintext credential; re-hash it with pms-hash-password");
            return password == stored;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_credentials_verify() {
        let hashed = hash_password("hunter2").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(CredentialPolicy::default().matches("hunter2", &hashed));
        assert!(!CredentialPolicy::default().matches("hunter3", &hashed));
    }

    #[test]
    fn plaintext_rows_are_refused_unless_allowed() {
        assert!(!CredentialPolicy::new(false).matches("password", "password"));
        assert!(CredentialPolicy::new(true).matches("password", "password"));
        assert!(!CredentialPolicy::new(true).matches("Password", "password"));
    }
}
