//! In-memory registries owning accounts and posts.
//!
//! # Responsibility
//! - Own entity records and issue their identities.
//! - Surface every violated precondition as one of three error kinds.
//!
//! # Invariants
//! - Each registry guards its state with one read/write lock.
//! - Cross-registry operations lock the account registry before the post
//!   registry.
//! - An operation either fully applies or leaves the state untouched.

pub mod account_registry;
pub mod post_registry;

use crate::model::validation::ValidationError;
use crate::model::{AccountId, PostId};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
}

/// Lookup failure on a caller-supplied key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Account(AccountId),
    Username(String),
    Post(PostId),
    /// The author has no posts.
    PostsByAuthor(AccountId),
}

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account(id) => write!(f, "account not found: {id}"),
            Self::Username(username) => write!(f, "username not found: `{username}`"),
            Self::Post(id) => write!(f, "post not found: {id}"),
            Self::PostsByAuthor(id) => write!(f, "no posts found for account {id}"),
        }
    }
}

/// Write rejected because it collides with current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    EmailTaken(String),
    UsernameTaken(String),
    AlreadyLiked { post: PostId, account: AccountId },
    NotLiked { post: PostId, account: AccountId },
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailTaken(email) => write!(f, "email already in use: `{email}`"),
            Self::UsernameTaken(username) => {
                write!(f, "username already in use: `{username}`")
            }
            Self::AlreadyLiked { post, account } => {
                write!(f, "account {account} already likes post {post}")
            }
            Self::NotLiked { post, account } => {
                write!(f, "account {account} does not like post {post}")
            }
        }
    }
}

/// Registry operation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Validation(ValidationError),
    NotFound(NotFound),
    Conflict(Conflict),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
        }
    }

    /// Stable code used in log events.
    pub(crate) fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(err) => write!(f, "{err}"),
            Self::Conflict(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Conflict(_) => None,
        }
    }
}

impl From<ValidationError> for RegistryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<NotFound> for RegistryError {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}

impl From<Conflict> for RegistryError {
    fn from(value: Conflict) -> Self {
        Self::Conflict(value)
    }
}

/// Emits the standard rejection event for a failed registry operation.
pub(crate) fn log_rejected(module: &str, event: &str, err: &RegistryError) {
    warn!(
        "event={} module={} status=rejected error_code={}",
        event,
        module,
        err.code()
    );
}
