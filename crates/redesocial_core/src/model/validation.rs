//! Input validation failures shared by both registries.
//!
//! Every variant describes caller-fixable input: the shape of the value is
//! wrong, independent of what the store currently holds.

use crate::model::{AccountId, PostId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Malformed or missing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Display name is blank after trim.
    EmptyName,
    /// Username is blank after trim.
    EmptyUsername,
    /// Email has no `@`.
    InvalidEmail(String),
    /// Secret shorter than the configured minimum.
    SecretTooShort { min: usize },
    /// Search term is blank after trim.
    EmptySearchTerm,
    /// Credential check failed for an existing username.
    WrongSecret,
    /// Identity `0` (or otherwise never issued) used as an account key.
    InvalidAccountId(AccountId),
    /// Identity `0` (or otherwise never issued) used as a post key.
    InvalidPostId(PostId),
    /// Account argument does not resolve to a registered account.
    UnknownAccount(AccountId),
    /// An account cannot befriend itself.
    SelfFriendship(AccountId),
    /// Post content is blank after trim.
    EmptyContent,
    /// Post content exceeds the configured limit.
    ContentTooLong { max: usize, actual: usize },
    /// Post author is not a registered account.
    UnknownAuthor(AccountId),
    /// Comment was submitted without a parent post.
    MissingParentPost,
    /// Comment body is blank after trim.
    EmptyComment,
    /// Comment body exceeds the configured limit.
    CommentTooLong { max: usize, actual: usize },
    /// A store limit is zero.
    InvalidLimit(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::SecretTooShort { min } => {
                write!(f, "secret must contain at least {min} characters")
            }
            Self::EmptySearchTerm => write!(f, "search term must not be empty"),
            Self::WrongSecret => write!(f, "secret does not match"),
            Self::InvalidAccountId(id) => write!(f, "invalid account id: {id}"),
            Self::InvalidPostId(id) => write!(f, "invalid post id: {id}"),
            Self::UnknownAccount(id) => write!(f, "account is not registered: {id}"),
            Self::SelfFriendship(id) => write!(f, "account {id} cannot befriend itself"),
            Self::EmptyContent => write!(f, "post content must not be empty"),
            Self::ContentTooLong { max, actual } => {
                write!(f, "post content has {actual} characters; limit is {max}")
            }
            Self::UnknownAuthor(id) => write!(f, "post author is not registered: {id}"),
            Self::MissingParentPost => write!(f, "comment has no parent post"),
            Self::EmptyComment => write!(f, "comment must not be empty"),
            Self::CommentTooLong { max, actual } => {
                write!(f, "comment has {actual} characters; limit is {max}")
            }
            Self::InvalidLimit(name) => write!(f, "store limit `{name}` must be positive"),
        }
    }
}

impl Error for ValidationError {}
