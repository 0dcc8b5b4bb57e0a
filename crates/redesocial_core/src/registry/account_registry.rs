//! Account registry.
//!
//! # Responsibility
//! - Register, look up, update and remove accounts.
//! - Enforce username/email uniqueness through case-folded indexes.
//! - Maintain the symmetric friendship relation.
//!
//! # Invariants
//! - No two accounts share a username or an email (compared case-insensitively).
//! - `a` is in `b.friends` iff `b` is in `a.friends`; nobody befriends themself.
//! - Identities start at 1 and are never reused, even after `remove`.
//! - Removing an account detaches it from every friend set but leaves its
//!   posts, comments and likes in the post registry.

use crate::config::StoreLimits;
use crate::model::account::{identity_key, validate_profile, Account, AccountDraft};
use crate::model::validation::ValidationError;
use crate::model::{AccountId, IdSequence, PostId};
use crate::registry::{log_rejected, Conflict, NotFound, RegistryError, RegistryResult};
use log::{debug, info};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{BTreeMap, HashMap};

const MODULE: &str = "accounts";

/// Lock-guarded account state.
#[derive(Debug, Default)]
pub(crate) struct AccountStore {
    accounts: BTreeMap<AccountId, Account>,
    by_username: HashMap<String, AccountId>,
    by_email: HashMap<String, AccountId>,
    ids: IdSequence,
}

impl AccountStore {
    pub(crate) fn get(&self, id: AccountId) -> RegistryResult<&Account> {
        self.accounts
            .get(&id)
            .ok_or(RegistryError::NotFound(NotFound::Account(id)))
    }

    pub(crate) fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    /// Appends `post` to the account's post list if it is not there yet.
    pub(crate) fn attach_post(
        &mut self,
        account: AccountId,
        post: PostId,
    ) -> Result<(), ValidationError> {
        if !post.is_valid() {
            return Err(ValidationError::InvalidPostId(post));
        }
        let owner = self
            .accounts
            .get_mut(&account)
            .ok_or(ValidationError::UnknownAccount(account))?;
        owner.add_post(post);
        Ok(())
    }

    /// Drops `post` from the account's post list. Missing accounts are ignored.
    pub(crate) fn detach_post(&mut self, account: AccountId, post: PostId) -> bool {
        self.accounts
            .get_mut(&account)
            .is_some_and(|owner| owner.remove_post(post))
    }

    fn ensure_unique(
        &self,
        id: Option<AccountId>,
        username: &str,
        email: &str,
    ) -> RegistryResult<()> {
        let collides = |index: &HashMap<String, AccountId>, value: &str| {
            index
                .get(&identity_key(value))
                .is_some_and(|owner| Some(*owner) != id)
        };
        if collides(&self.by_email, email) {
            return Err(Conflict::EmailTaken(email.to_string()).into());
        }
        if collides(&self.by_username, username) {
            return Err(Conflict::UsernameTaken(username.to_string()).into());
        }
        Ok(())
    }

    fn index(&mut self, account: &Account) {
        self.by_username
            .insert(identity_key(&account.username), account.id);
        self.by_email.insert(identity_key(&account.email), account.id);
    }

    fn unindex(&mut self, account: &Account) {
        self.by_username.remove(&identity_key(&account.username));
        self.by_email.remove(&identity_key(&account.email));
    }

    fn resolve_pair(&self, first: AccountId, second: AccountId) -> RegistryResult<()> {
        for id in [first, second] {
            if !id.is_valid() {
                return Err(ValidationError::InvalidAccountId(id).into());
            }
        }
        self.get(first)?;
        self.get(second)?;
        Ok(())
    }
}

/// Registry owning every account record.
#[derive(Debug)]
pub struct AccountRegistry {
    limits: StoreLimits,
    state: RwLock<AccountStore>,
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRegistry {
    /// Creates an empty registry with default limits.
    pub fn new() -> Self {
        Self {
            limits: StoreLimits::default(),
            state: RwLock::new(AccountStore::default()),
        }
    }

    /// Creates an empty registry with caller-provided limits.
    pub fn with_limits(limits: StoreLimits) -> RegistryResult<Self> {
        limits.validate()?;
        Ok(Self {
            limits,
            state: RwLock::new(AccountStore::default()),
        })
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.limits
    }

    pub(crate) fn read_store(&self) -> RwLockReadGuard<'_, AccountStore> {
        self.state.read()
    }

    pub(crate) fn write_store(&self) -> RwLockWriteGuard<'_, AccountStore> {
        self.state.write()
    }

    /// Identity the next successful `register` will receive.
    pub fn next_id(&self) -> AccountId {
        AccountId::new(self.state.read().ids.peek())
    }

    pub fn len(&self) -> usize {
        self.state.read().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().accounts.is_empty()
    }

    /// Registers a new account and returns the stored record.
    ///
    /// # Errors
    /// - `Validation` when a field breaks a shape rule.
    /// - `Conflict` when the email or username is already taken.
    pub fn register(&self, draft: AccountDraft) -> RegistryResult<Account> {
        self.register_inner(draft)
            .inspect_err(|err| log_rejected(MODULE, "account_register", err))
    }

    fn register_inner(&self, draft: AccountDraft) -> RegistryResult<Account> {
        let draft = draft.normalized(&self.limits)?;
        let mut state = self.state.write();
        state.ensure_unique(None, &draft.username, &draft.email)?;

        let id = AccountId::new(state.ids.issue());
        let account = Account::from_draft(id, draft);
        state.index(&account);
        state.accounts.insert(id, account.clone());

        info!("event=account_register module=accounts status=ok account_id={id}");
        Ok(account)
    }

    /// Returns the account with the given identity.
    pub fn find_by_id(&self, id: AccountId) -> RegistryResult<Account> {
        self.state.read().get(id).cloned()
    }

    /// Returns the account whose username matches, ignoring case.
    pub fn find_by_username(&self, username: &str) -> RegistryResult<Account> {
        if username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername.into());
        }
        let state = self.state.read();
        let id = state
            .by_username
            .get(&identity_key(username))
            .copied()
            .ok_or_else(|| NotFound::Username(username.to_string()))?;
        state.get(id).cloned()
    }

    /// Case-insensitive substring search over display names.
    ///
    /// Returns an empty list when nothing matches.
    pub fn search_by_name(&self, term: &str) -> RegistryResult<Vec<Account>> {
        let needle = search_needle(term)?;
        let state = self.state.read();
        Ok(state
            .accounts
            .values()
            .filter(|account| account.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    /// Case-insensitive substring search over display names and usernames.
    ///
    /// Each account appears once, in identity order.
    pub fn search(&self, term: &str) -> RegistryResult<Vec<Account>> {
        let needle = search_needle(term)?;
        let state = self.state.read();
        Ok(state
            .accounts
            .values()
            .filter(|account| {
                account.name.to_lowercase().contains(&needle)
                    || account.username.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    /// All accounts in identity order.
    pub fn list_all(&self) -> Vec<Account> {
        self.state.read().accounts.values().cloned().collect()
    }

    /// Resolved friend records of one account, in identity order.
    pub fn friends_of(&self, id: AccountId) -> RegistryResult<Vec<Account>> {
        let state = self.state.read();
        let account = state.get(id)?;
        Ok(account
            .friends
            .iter()
            .filter_map(|friend| state.accounts.get(friend))
            .cloned()
            .collect())
    }

    /// Replaces the profile fields of the account with `account.id`.
    ///
    /// Only name, username, email, secret and registration timestamp are
    /// copied; friends and the post list stay registry-maintained.
    ///
    /// Returns `Ok(false)` when no account has that identity.
    pub fn update(&self, account: &Account) -> RegistryResult<bool> {
        self.update_inner(account)
            .inspect_err(|err| log_rejected(MODULE, "account_update", err))
    }

    fn update_inner(&self, account: &Account) -> RegistryResult<bool> {
        validate_profile(
            &account.name,
            &account.username,
            &account.email,
            &account.secret,
            &self.limits,
        )?;

        let mut state = self.state.write();
        let Some(existing) = state.accounts.get(&account.id).cloned() else {
            debug!(
                "event=account_update module=accounts status=missing account_id={}",
                account.id
            );
            return Ok(false);
        };
        state.ensure_unique(
            Some(account.id),
            account.username.trim(),
            account.email.trim(),
        )?;

        let mut updated = existing.clone();
        updated.apply_profile(account);
        state.unindex(&existing);
        state.index(&updated);
        state.accounts.insert(updated.id, updated);

        info!(
            "event=account_update module=accounts status=ok account_id={}",
            account.id
        );
        Ok(true)
    }

    /// Deletes an account. Returns `Ok(false)` when it does not exist.
    ///
    /// Friend links pointing at the removed account are dropped; authored
    /// content is kept.
    pub fn remove(&self, id: AccountId) -> RegistryResult<bool> {
        if !id.is_valid() {
            let err = RegistryError::from(ValidationError::InvalidAccountId(id));
            log_rejected(MODULE, "account_remove", &err);
            return Err(err);
        }

        let mut state = self.state.write();
        let Some(removed) = state.accounts.remove(&id) else {
            return Ok(false);
        };
        state.unindex(&removed);
        for friend in &removed.friends {
            if let Some(account) = state.accounts.get_mut(friend) {
                account.remove_friend(id);
            }
        }

        info!(
            "event=account_remove module=accounts status=ok account_id={} detached_friends={} orphaned_posts={}",
            id,
            removed.friends.len(),
            removed.posts.len()
        );
        Ok(true)
    }

    /// Makes two accounts mutual friends. Idempotent.
    pub fn add_friendship(&self, first: AccountId, second: AccountId) -> RegistryResult<()> {
        self.add_friendship_inner(first, second)
            .inspect_err(|err| log_rejected(MODULE, "friendship_add", err))
    }

    fn add_friendship_inner(&self, first: AccountId, second: AccountId) -> RegistryResult<()> {
        let mut state = self.state.write();
        state.resolve_pair(first, second)?;
        if first == second {
            return Err(ValidationError::SelfFriendship(first).into());
        }

        for (owner, other) in [(first, second), (second, first)] {
            if let Some(account) = state.accounts.get_mut(&owner) {
                account.add_friend(other);
            }
        }

        info!("event=friendship_add module=accounts status=ok first={first} second={second}");
        Ok(())
    }

    /// Ends a friendship on both sides. Removing a missing link is a no-op.
    pub fn remove_friendship(&self, first: AccountId, second: AccountId) -> RegistryResult<()> {
        let mut state = self.state.write();
        state
            .resolve_pair(first, second)
            .inspect_err(|err| log_rejected(MODULE, "friendship_remove", err))?;

        let mut changed = false;
        for (owner, other) in [(first, second), (second, first)] {
            if let Some(account) = state.accounts.get_mut(&owner) {
                changed |= account.remove_friend(other);
            }
        }

        info!(
            "event=friendship_remove module=accounts status=ok first={first} second={second} changed={changed}"
        );
        Ok(())
    }

    /// Records `post` in the account's post list.
    ///
    /// # Errors
    /// - `Validation` when the post identity is invalid or the account is not
    ///   registered.
    pub fn add_post_reference(&self, account: AccountId, post: PostId) -> RegistryResult<()> {
        self.state
            .write()
            .attach_post(account, post)
            .map_err(RegistryError::from)
            .inspect_err(|err| log_rejected(MODULE, "post_reference_add", err))
    }

    /// Drops `post` from the account's post list. Returns whether it was present.
    pub fn remove_post_reference(&self, account: AccountId, post: PostId) -> bool {
        self.state.write().detach_post(account, post)
    }

    /// Simple credential check against the stored opaque secret.
    ///
    /// # Errors
    /// - `NotFound` when the username is unknown.
    /// - `Validation(WrongSecret)` when the secret does not match.
    pub fn authenticate(&self, username: &str, secret: &str) -> RegistryResult<Account> {
        let account = self
            .find_by_username(username)
            .inspect_err(|err| log_rejected(MODULE, "account_authenticate", err))?;
        if account.secret != secret {
            let err = RegistryError::from(ValidationError::WrongSecret);
            log_rejected(MODULE, "account_authenticate", &err);
            return Err(err);
        }
        info!(
            "event=account_authenticate module=accounts status=ok account_id={}",
            account.id
        );
        Ok(account)
    }
}

fn search_needle(term: &str) -> Result<String, ValidationError> {
    if term.trim().is_empty() {
        return Err(ValidationError::EmptySearchTerm);
    }
    Ok(term.to_lowercase())
}
