//! User accounts (identities).
//!
//! Credentials are stored and compared in plaintext, faithful to the system
//! this replaces. Known defect; hashing is out of scope here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// An account with a role.
///
/// `id` is immutable; `username` and `password` are mutable; `role` changes
/// only through [`User::change_role`] (a privileged operation — callers gate
/// it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Self-service registration. Always creates a STAFF account; other roles
    /// are created administratively via [`User::with_role`].
    pub fn register(username: impl Into<String>, password: impl Into<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        Self::with_role(username, password, Role::Staff, now)
    }

    pub fn with_role(
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }
        Ok(Self {
            id: UserId::new(),
            username,
            password,
            role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Plaintext comparison (see module docs).
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn update_credentials(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }
        self.username = username;
        self.password = password;
        self.updated_at = now;
        Ok(())
    }

    pub fn change_role(&mut self, role: Role, now: DateTime<Utc>) {
        self.role = role;
        self.updated_at = now;
    }
}
