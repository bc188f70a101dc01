//! Credential digest used for both storage and comparison.

use sha1::{Digest, Sha1};

/// Digest `password` followed by the static `salt` as lowercase hex.
///
/// The same input always yields the same digest, which is what lets the
/// store match credentials by equality.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_password("Password", "salt"),
            "38a8fde622c0cf723934ba7138a72beaccfc69d4"
        );
        assert_eq!(
            hash_password("pass", "salt"),
            "11f5639f22525155cb0b43573ee4212838c78d87"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let first = hash_password("Password", "salt");
        let second = hash_password("Password", "salt");
        assert_eq!(first, second);
        assert_eq!(first.len(), 40);
    }

    #[test]
    fn test_salt_changes_digest() {
        assert_ne!(hash_password("Password", "salt"), hash_password("Password", "pepper"));
        assert_ne!(hash_password("Password", "salt"), hash_password("salt", "Password"));
    }
}
