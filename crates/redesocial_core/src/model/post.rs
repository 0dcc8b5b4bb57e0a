//! Post domain model.
//!
//! # Responsibility
//! - Define the post record, its draft, and like/comment mutators.
//!
//! # Invariants
//! - `likes` holds each account at most once.
//! - `comments` keeps attachment order.
//! - `content` is stored trimmed.

use crate::model::comment::Comment;
use crate::model::{format_timestamp, AccountId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: AccountId,
    pub content: String,
    pub published_at: DateTime<Utc>,
    /// Accounts that like this post.
    pub likes: BTreeSet<AccountId>,
    pub comments: Vec<Comment>,
}

impl Post {
    pub(crate) fn from_draft(id: PostId, draft: PostDraft) -> Self {
        Self {
            id,
            author: draft.author,
            content: draft.content.trim().to_string(),
            published_at: draft.published_at,
            likes: BTreeSet::new(),
            comments: Vec::new(),
        }
    }

    pub fn is_liked_by(&self, account: AccountId) -> bool {
        self.likes.contains(&account)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub(crate) fn add_like(&mut self, account: AccountId) -> bool {
        self.likes.insert(account)
    }

    pub(crate) fn remove_like(&mut self, account: AccountId) -> bool {
        self.likes.remove(&account)
    }

    pub(crate) fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} by account {} at {}\n{}\nlikes: {} | comments: {}",
            self.id,
            self.author,
            format_timestamp(&self.published_at),
            self.content,
            self.like_count(),
            self.comments.len()
        )
    }
}

/// Post input. Identity is assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub author: AccountId,
    pub content: String,
    pub published_at: DateTime<Utc>,
}

impl PostDraft {
    /// Creates a draft stamped with the current time.
    pub fn new(author: AccountId, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
            published_at: Utc::now(),
        }
    }

    /// Overrides the publication timestamp.
    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Post, PostDraft};
    use crate::model::{AccountId, PostId};

    #[test]
    fn from_draft_trims_content_and_starts_empty() {
        let draft = PostDraft::new(AccountId::new(1), "  hello  ");
        let post = Post::from_draft(PostId::new(1), draft);
        assert_eq!(post.content, "hello");
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn likes_have_set_semantics() {
        let mut post = Post::from_draft(PostId::new(1), PostDraft::new(AccountId::new(1), "x"));
        assert!(post.add_like(AccountId::new(2)));
        assert!(!post.add_like(AccountId::new(2)));
        assert_eq!(post.like_count(), 1);
        assert!(post.is_liked_by(AccountId::new(2)));
        assert!(post.remove_like(AccountId::new(2)));
        assert!(!post.remove_like(AccountId::new(2)));
    }
}
