use serde::{Deserialize, Serialize};

/// Represents an account in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier assigned by the store
    pub id: String,
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Credential digest, never the plaintext
    pub password: String,
}

impl User {
    /// Build a record that has not been persisted yet.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_digest: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            username: username.into(),
            email: email.into(),
            password: password_digest.into(),
        }
    }

    /// Return a copy carrying the identifier chosen by a store.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
