//! Demo network seeded by the CLI.
//!
//! Secrets are stored base64-encoded; `encode_secret` must be applied to any
//! plain secret before it is compared by `authenticate`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use redesocial_core::{
    AccountDraft, AccountId, AccountRegistry, CommentDraft, PostDraft, PostRegistry,
    RegistryResult,
};

pub struct DemoAccounts {
    pub carlos: AccountId,
    pub fernanda: AccountId,
    pub ricardo: AccountId,
}

pub fn encode_secret(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

fn draft(name: &str, username: &str, email: &str, secret: &str) -> AccountDraft {
    AccountDraft::new(name, username, email, encode_secret(secret))
}

/// Registers three accounts, two posts with comments and likes, and links
/// the accounts as friends.
pub fn seed(accounts: &AccountRegistry, posts: &PostRegistry) -> RegistryResult<DemoAccounts> {
    let carlos = accounts
        .register(draft(
            "Carlos Mendes",
            "carlos.m",
            "carlos.mendes@email.com",
            "senhaCarlos123",
        ))?
        .id;
    let fernanda = accounts
        .register(draft(
            "Fernanda Costa",
            "fernanda.c",
            "fernanda.costa@email.com",
            "senhaFernanda456",
        ))?
        .id;
    let ricardo = accounts
        .register(draft(
            "Ricardo Almeida",
            "ricardo.a",
            "ricardo.almeida@email.com",
            "senhaRicardo789",
        ))?
        .id;

    accounts.add_friendship(carlos, fernanda)?;
    accounts.add_friendship(carlos, ricardo)?;

    let now = Utc::now();
    let first = posts.create(
        PostDraft::new(carlos, "Hoje é um ótimo dia para aprender algo novo!")
            .published_at(now - Duration::hours(2)),
    )?;
    let second = posts.create(
        PostDraft::new(fernanda, "Fui ao parque e tirei fotos incríveis!")
            .published_at(now - Duration::hours(1)),
    )?;

    posts.add_comment(CommentDraft::new(ricardo, "Adorei sua energia, Carlos!").on_post(first.id))?;
    posts.add_comment(
        CommentDraft::new(carlos, "As fotos devem estar lindas, Fernanda!").on_post(second.id),
    )?;

    posts.like(first.id, fernanda)?;
    posts.like(first.id, ricardo)?;
    posts.like(second.id, carlos)?;

    Ok(DemoAccounts {
        carlos,
        fernanda,
        ricardo,
    })
}
