//! Comment domain model.
//!
//! Comments are append-only: once attached to a post they are never
//! mutated and only disappear together with their parent post.

use crate::model::{format_timestamp, AccountId, CommentId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Parent post.
    pub post: PostId,
    pub author: AccountId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Display for Comment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} by account {} at {}: {}",
            self.id,
            self.author,
            format_timestamp(&self.created_at),
            self.content
        )
    }
}

/// Comment input. `post` may be left unset by callers that build the draft
/// before choosing a target; the registry rejects such drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub post: Option<PostId>,
    pub author: AccountId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CommentDraft {
    /// Creates a detached draft stamped with the current time.
    pub fn new(author: AccountId, content: impl Into<String>) -> Self {
        Self {
            post: None,
            author,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Sets the parent post.
    pub fn on_post(mut self, post: PostId) -> Self {
        self.post = Some(post);
        self
    }

    /// Overrides the creation timestamp.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}
