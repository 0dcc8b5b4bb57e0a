//! Post registry.
//!
//! # Responsibility
//! - Create, look up, list and delete posts.
//! - Manage likes (set semantics) and comments (append-only) per post.
//! - Resolve author and liker references through the account registry.
//!
//! # Invariants
//! - A post is only stored when its author is registered and its content
//!   passes `validate`.
//! - Post and comment identities come from two counters owned by this
//!   registry, each starting at 1 and never reused.
//! - The account lock is always taken before the post lock.

use crate::config::StoreLimits;
use crate::model::comment::{Comment, CommentDraft};
use crate::model::post::{Post, PostDraft};
use crate::model::validation::ValidationError;
use crate::model::{AccountId, CommentId, IdSequence, PostId};
use crate::registry::account_registry::{AccountRegistry, AccountStore};
use crate::registry::{log_rejected, Conflict, NotFound, RegistryError, RegistryResult};
use log::info;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::BTreeMap;
use std::sync::Arc;

const MODULE: &str = "posts";

/// Lock-guarded post state.
#[derive(Debug, Default)]
pub(crate) struct PostStore {
    posts: BTreeMap<PostId, Post>,
    post_ids: IdSequence,
    comment_ids: IdSequence,
}

impl PostStore {
    fn get(&self, id: PostId) -> RegistryResult<&Post> {
        self.posts
            .get(&id)
            .ok_or(RegistryError::NotFound(NotFound::Post(id)))
    }

    fn get_mut(&mut self, id: PostId) -> RegistryResult<&mut Post> {
        self.posts
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(NotFound::Post(id)))
    }

    /// Posts in creation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }
}

/// Registry owning every post and comment record.
#[derive(Debug)]
pub struct PostRegistry {
    accounts: Arc<AccountRegistry>,
    state: RwLock<PostStore>,
}

impl PostRegistry {
    /// Creates an empty registry resolving accounts through `accounts`.
    pub fn new(accounts: Arc<AccountRegistry>) -> Self {
        Self {
            accounts,
            state: RwLock::new(PostStore::default()),
        }
    }

    pub fn accounts(&self) -> &Arc<AccountRegistry> {
        &self.accounts
    }

    pub(crate) fn read_store(&self) -> RwLockReadGuard<'_, PostStore> {
        self.state.read()
    }

    fn limits(&self) -> &StoreLimits {
        self.accounts.limits()
    }

    /// Identity the next successful `create` will receive.
    pub fn next_id(&self) -> PostId {
        PostId::new(self.state.read().post_ids.peek())
    }

    pub fn len(&self) -> usize {
        self.state.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().posts.is_empty()
    }

    /// Validates and stores a new post, then records it on the author's
    /// post list.
    ///
    /// # Errors
    /// - `Validation` when the content or author breaks a post rule.
    pub fn create(&self, draft: PostDraft) -> RegistryResult<Post> {
        self.create_inner(draft)
            .inspect_err(|err| log_rejected(MODULE, "post_create", err))
    }

    fn create_inner(&self, draft: PostDraft) -> RegistryResult<Post> {
        let mut accounts = self.accounts.write_store();
        check_post(&accounts, self.limits(), draft.author, &draft.content)?;

        let mut state = self.state.write();
        let id = PostId::new(state.post_ids.issue());
        accounts.attach_post(draft.author, id)?;
        let post = Post::from_draft(id, draft);
        state.posts.insert(id, post.clone());

        info!(
            "event=post_create module=posts status=ok post_id={} author_id={} chars={}",
            id,
            post.author,
            post.content.chars().count()
        );
        Ok(post)
    }

    /// Checks the post rules: non-blank content within the length limit and
    /// a positive, registered author identity.
    pub fn validate(&self, post: &Post) -> RegistryResult<()> {
        let accounts = self.accounts.read_store();
        check_post(&accounts, self.limits(), post.author, &post.content)
    }

    /// Returns the post with the given identity.
    pub fn find_by_id(&self, id: PostId) -> RegistryResult<Post> {
        self.state.read().get(id).cloned()
    }

    /// All posts in creation order.
    pub fn list_all(&self) -> Vec<Post> {
        self.state.read().iter().cloned().collect()
    }

    /// Posts authored by `author`, in creation order.
    ///
    /// # Errors
    /// - `NotFound(PostsByAuthor)` when the author has no posts.
    pub fn list_by_author(&self, author: AccountId) -> RegistryResult<Vec<Post>> {
        let posts: Vec<Post> = self
            .state
            .read()
            .iter()
            .filter(|post| post.author == author)
            .cloned()
            .collect();
        if posts.is_empty() {
            return Err(NotFound::PostsByAuthor(author).into());
        }
        Ok(posts)
    }

    /// Adds `account` to the post's like set.
    ///
    /// # Errors
    /// - `NotFound` when the post or the account does not exist.
    /// - `Conflict(AlreadyLiked)` when the account already likes the post.
    pub fn like(&self, post: PostId, account: AccountId) -> RegistryResult<()> {
        self.like_inner(post, account)
            .inspect_err(|err| log_rejected(MODULE, "post_like", err))
    }

    fn like_inner(&self, post_id: PostId, account: AccountId) -> RegistryResult<()> {
        let accounts = self.accounts.read_store();
        let mut state = self.state.write();
        let post = state.get_mut(post_id)?;
        accounts.get(account)?;
        if !post.add_like(account) {
            return Err(Conflict::AlreadyLiked {
                post: post_id,
                account,
            }
            .into());
        }

        info!(
            "event=post_like module=posts status=ok post_id={post_id} account_id={account} likes={}",
            post.like_count()
        );
        Ok(())
    }

    /// Removes `account` from the post's like set.
    ///
    /// # Errors
    /// - `NotFound` when the post or the account does not exist.
    /// - `Conflict(NotLiked)` when the account does not like the post.
    pub fn unlike(&self, post: PostId, account: AccountId) -> RegistryResult<()> {
        self.unlike_inner(post, account)
            .inspect_err(|err| log_rejected(MODULE, "post_unlike", err))
    }

    fn unlike_inner(&self, post_id: PostId, account: AccountId) -> RegistryResult<()> {
        let accounts = self.accounts.read_store();
        let mut state = self.state.write();
        let post = state.get_mut(post_id)?;
        accounts.get(account)?;
        if !post.remove_like(account) {
            return Err(Conflict::NotLiked {
                post: post_id,
                account,
            }
            .into());
        }

        info!(
            "event=post_unlike module=posts status=ok post_id={post_id} account_id={account} likes={}",
            post.like_count()
        );
        Ok(())
    }

    /// Identities of the accounts liking a post, ascending.
    pub fn likes_of(&self, post: PostId) -> RegistryResult<Vec<AccountId>> {
        Ok(self.state.read().get(post)?.likes.iter().copied().collect())
    }

    /// Appends a comment to its parent post and returns the stored record.
    ///
    /// # Errors
    /// - `Validation` when the draft has no parent post or a blank/oversized body.
    /// - `NotFound` when the parent post or the comment author does not exist.
    pub fn add_comment(&self, draft: CommentDraft) -> RegistryResult<Comment> {
        self.add_comment_inner(draft)
            .inspect_err(|err| log_rejected(MODULE, "comment_add", err))
    }

    fn add_comment_inner(&self, draft: CommentDraft) -> RegistryResult<Comment> {
        let post_id = draft.post.ok_or(ValidationError::MissingParentPost)?;
        let content = check_comment(self.limits(), &draft.content)?;

        let accounts = self.accounts.read_store();
        let mut state = self.state.write();
        state.get(post_id)?;
        if !accounts.contains(draft.author) {
            return Err(NotFound::Account(draft.author).into());
        }

        let comment = Comment {
            id: CommentId::new(state.comment_ids.issue()),
            post: post_id,
            author: draft.author,
            content,
            created_at: draft.created_at,
        };
        state.get_mut(post_id)?.push_comment(comment.clone());

        info!(
            "event=comment_add module=posts status=ok post_id={} comment_id={} author_id={}",
            post_id, comment.id, comment.author
        );
        Ok(comment)
    }

    /// Comments of a post in attachment order.
    pub fn comments_of(&self, post: PostId) -> RegistryResult<Vec<Comment>> {
        Ok(self.state.read().get(post)?.comments.clone())
    }

    /// Deletes a post together with its comments and likes.
    ///
    /// # Errors
    /// - `NotFound` when the post does not exist.
    pub fn delete(&self, id: PostId) -> RegistryResult<bool> {
        let mut accounts = self.accounts.write_store();
        let mut state = self.state.write();
        let Some(removed) = state.posts.remove(&id) else {
            let err = RegistryError::from(NotFound::Post(id));
            log_rejected(MODULE, "post_delete", &err);
            return Err(err);
        };
        accounts.detach_post(removed.author, id);

        info!(
            "event=post_delete module=posts status=ok post_id={} comments={} likes={}",
            id,
            removed.comments.len(),
            removed.like_count()
        );
        Ok(true)
    }
}

fn check_post(
    accounts: &AccountStore,
    limits: &StoreLimits,
    author: AccountId,
    content: &str,
) -> RegistryResult<()> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent.into());
    }
    let actual = trimmed.chars().count();
    if actual > limits.max_post_chars {
        return Err(ValidationError::ContentTooLong {
            max: limits.max_post_chars,
            actual,
        }
        .into());
    }
    if !author.is_valid() {
        return Err(ValidationError::InvalidAccountId(author).into());
    }
    if !accounts.contains(author) {
        return Err(ValidationError::UnknownAuthor(author).into());
    }
    Ok(())
}

fn check_comment(limits: &StoreLimits, content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    let actual = trimmed.chars().count();
    if actual > limits.max_comment_chars {
        return Err(ValidationError::CommentTooLong {
            max: limits.max_comment_chars,
            actual,
        });
    }
    Ok(trimmed.to_string())
}
