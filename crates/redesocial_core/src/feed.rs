//! News feed projection.
//!
//! # Invariants
//! - The feed holds posts authored by the viewer or a current friend.
//! - Order is newest first; posts with equal timestamps keep creation order.
//! - Nothing is stored: every call recomputes from registry state.

use crate::model::post::Post;
use crate::model::AccountId;
use crate::registry::post_registry::PostRegistry;
use crate::registry::{log_rejected, RegistryResult};
use log::debug;
use std::collections::BTreeSet;

impl PostRegistry {
    /// Builds the feed of `viewer`.
    ///
    /// # Errors
    /// - `NotFound` when the viewer is not registered.
    pub fn feed(&self, viewer: AccountId) -> RegistryResult<Vec<Post>> {
        let accounts = self.accounts().read_store();
        let account = accounts
            .get(viewer)
            .inspect_err(|err| log_rejected("feed", "feed_build", err))?;
        let mut circle: BTreeSet<AccountId> = account.friends.clone();
        circle.insert(viewer);

        let posts = self.read_store();
        let mut feed: Vec<Post> = posts
            .iter()
            .filter(|post| circle.contains(&post.author))
            .cloned()
            .collect();
        newest_first(&mut feed);

        debug!(
            "event=feed_build module=feed status=ok viewer_id={} circle={} posts={}",
            viewer,
            circle.len(),
            feed.len()
        );
        Ok(feed)
    }
}

/// Sorts by publication time, newest first. Stable, so ties keep input order.
pub fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|left, right| right.published_at.cmp(&left.published_at));
}
