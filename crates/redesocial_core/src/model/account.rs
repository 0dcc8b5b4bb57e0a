//! Account domain model.
//!
//! # Responsibility
//! - Define the account record and the draft used to register one.
//! - Provide invariant-preserving mutators for friends and owned posts.
//!
//! # Invariants
//! - `id` is assigned by the account registry and never changes.
//! - `friends` never contains the account's own `id`.
//! - `posts` holds each post identity at most once, in insertion order.
//! - `secret` is opaque to the store and never serialized.

use crate::config::StoreLimits;
use crate::model::validation::ValidationError;
use crate::model::{format_timestamp, AccountId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Unique handle, matched case-insensitively.
    pub username: String,
    /// Unique contact address, matched case-insensitively.
    pub email: String,
    /// Caller-encoded credential.
    #[serde(skip_serializing, default)]
    pub secret: String,
    pub registered_at: DateTime<Utc>,
    /// Symmetric friend relation, maintained by the account registry.
    pub friends: BTreeSet<AccountId>,
    /// Informational view of authored posts. The post registry is authoritative.
    pub posts: Vec<PostId>,
}

impl Account {
    pub(crate) fn from_draft(id: AccountId, draft: AccountDraft) -> Self {
        Self {
            id,
            name: draft.name,
            username: draft.username,
            email: draft.email,
            secret: draft.secret,
            registered_at: draft.registered_at,
            friends: BTreeSet::new(),
            posts: Vec::new(),
        }
    }

    pub fn is_friend_with(&self, other: AccountId) -> bool {
        self.friends.contains(&other)
    }

    pub(crate) fn add_friend(&mut self, other: AccountId) -> bool {
        if other == self.id {
            return false;
        }
        self.friends.insert(other)
    }

    pub(crate) fn remove_friend(&mut self, other: AccountId) -> bool {
        self.friends.remove(&other)
    }

    pub(crate) fn add_post(&mut self, post: PostId) -> bool {
        if self.posts.contains(&post) {
            return false;
        }
        self.posts.push(post);
        true
    }

    pub(crate) fn remove_post(&mut self, post: PostId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|current| *current != post);
        self.posts.len() != before
    }

    /// Copies the caller-editable profile fields from `source`.
    pub(crate) fn apply_profile(&mut self, source: &Account) {
        self.name = source.name.trim().to_string();
        self.username = source.username.trim().to_string();
        self.email = source.email.trim().to_string();
        self.secret = source.secret.clone();
        self.registered_at = source.registered_at;
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} (@{}) <{}> joined {} | friends: {} | posts: {}",
            self.id,
            self.name,
            self.username,
            self.email,
            format_timestamp(&self.registered_at),
            self.friends.len(),
            self.posts.len()
        )
    }
}

/// Registration input. Identity is assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub name: String,
    pub username: String,
    pub email: String,
    pub secret: String,
    pub registered_at: DateTime<Utc>,
}

impl AccountDraft {
    /// Creates a draft stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            secret: secret.into(),
            registered_at: Utc::now(),
        }
    }

    /// Overrides the registration timestamp.
    pub fn registered_at(mut self, at: DateTime<Utc>) -> Self {
        self.registered_at = at;
        self
    }

    /// Checks field shape rules and returns a trimmed copy.
    pub(crate) fn normalized(self, limits: &StoreLimits) -> Result<Self, ValidationError> {
        validate_profile(
            &self.name,
            &self.username,
            &self.email,
            &self.secret,
            limits,
        )?;
        Ok(Self {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        })
    }
}

/// Shape rules shared by registration and profile update.
pub(crate) fn validate_profile(
    name: &str,
    username: &str,
    email: &str,
    secret: &str,
    limits: &StoreLimits,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    if secret.chars().count() < limits.min_secret_chars {
        return Err(ValidationError::SecretTooShort {
            min: limits.min_secret_chars,
        });
    }
    Ok(())
}

/// Key used by the uniqueness indexes.
pub(crate) fn identity_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{identity_key, Account, AccountDraft};
    use crate::config::StoreLimits;
    use crate::model::validation::ValidationError;
    use crate::model::{AccountId, PostId};

    fn account(id: u64) -> Account {
        let draft = AccountDraft::new("Ana", "ana", "ana@example.com", "secret1");
        Account::from_draft(AccountId::new(id), draft)
    }

    #[test]
    fn add_friend_rejects_self() {
        let mut ana = account(1);
        assert!(!ana.add_friend(AccountId::new(1)));
        assert!(ana.friends.is_empty());
        assert!(ana.add_friend(AccountId::new(2)));
        assert!(!ana.add_friend(AccountId::new(2)));
        assert_eq!(ana.friends.len(), 1);
    }

    #[test]
    fn add_post_keeps_insertion_order_without_duplicates() {
        let mut ana = account(1);
        ana.add_post(PostId::new(3));
        ana.add_post(PostId::new(1));
        ana.add_post(PostId::new(3));
        assert_eq!(ana.posts, vec![PostId::new(3), PostId::new(1)]);
        assert!(ana.remove_post(PostId::new(3)));
        assert!(!ana.remove_post(PostId::new(3)));
    }

    #[test]
    fn normalized_trims_and_checks_secret_length() {
        let limits = StoreLimits::default();
        let draft = AccountDraft::new("  Ana  ", " ana ", " ana@example.com ", "secret1");
        let normalized = draft.normalized(&limits).expect("draft should be valid");
        assert_eq!(normalized.name, "Ana");
        assert_eq!(normalized.username, "ana");
        assert_eq!(normalized.email, "ana@example.com");

        let err = AccountDraft::new("Ana", "ana", "ana@example.com", "12345")
            .normalized(&limits)
            .expect_err("short secret must be rejected");
        assert_eq!(err, ValidationError::SecretTooShort { min: 6 });
    }

    #[test]
    fn identity_key_folds_case() {
        assert_eq!(identity_key(" Carlos.M "), "carlos.m");
    }
}
