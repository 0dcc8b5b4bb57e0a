//! Entity model for the social graph: accounts, posts and comments.
//!
//! # Responsibility
//! - Define the plain records owned by the registries.
//! - Provide integer identity key types used for every cross-reference.
//!
//! # Invariants
//! - Cross-references (author, friends, likers, parent post) are stored as
//!   identities, never as copies of the referenced record.
//! - Identity `0` is never issued; it is treated as an invalid key.

pub mod account;
pub mod comment;
pub mod post;
pub mod validation;

use chrono::{DateTime, Utc};

/// Timestamp rendering shared by the `Display` impls.
pub(crate) const DISPLAY_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(DISPLAY_TIME_FORMAT).to_string()
}

macro_rules! identity_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw identity value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw identity value.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Issued identities are always positive.
            pub const fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

identity_key!(
    /// Stable identity of an account, assigned on registration.
    AccountId
);
identity_key!(
    /// Stable identity of a post, assigned on creation.
    PostId
);
identity_key!(
    /// Stable identity of a comment, assigned when attached to a post.
    CommentId
);

/// Monotonic identity issuer owned by one registry instance.
///
/// Starts at 1 and is never rewound, so removed identities are not reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub(crate) const fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn issue(&mut self) -> u64 {
        let issued = self.next;
        self.next += 1;
        issued
    }

    pub(crate) const fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
