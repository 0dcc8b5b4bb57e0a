//! Core domain logic for the RedeSocial store.
//! This crate owns accounts, posts and their relations, and is the single
//! source of truth for their invariants.

pub mod config;
pub mod feed;
pub mod logging;
pub mod model;
pub mod registry;

pub use config::StoreLimits;
pub use feed::newest_first;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountDraft};
pub use model::comment::{Comment, CommentDraft};
pub use model::post::{Post, PostDraft};
pub use model::validation::ValidationError;
pub use model::{AccountId, CommentId, PostId};
pub use registry::account_registry::AccountRegistry;
pub use registry::post_registry::PostRegistry;
pub use registry::{Conflict, ErrorKind, NotFound, RegistryError, RegistryResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
