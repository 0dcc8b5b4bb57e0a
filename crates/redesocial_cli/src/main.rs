//! CLI smoke entry point.
//!
//! # Responsibility
//! - Seed a small demo network and print every account's feed.
//! - Keep output deterministic apart from timestamps.

mod demo;

use log::info;
use redesocial_core::{AccountId, AccountRegistry, PostRegistry, RegistryResult};
use std::sync::Arc;

const LOG_DIR_ENV: &str = "REDESOCIAL_LOG_DIR";
const LOG_LEVEL_ENV: &str = "REDESOCIAL_LOG_LEVEL";

fn main() {
    let log_dir = std::env::var(LOG_DIR_ENV).unwrap_or_else(|_| {
        std::env::temp_dir()
            .join("redesocial")
            .to_string_lossy()
            .into_owned()
    });
    let level = std::env::var(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| redesocial_core::default_log_level().to_string());
    if let Err(err) = redesocial_core::init_logging(&level, &log_dir) {
        eprintln!("logging disabled: {err}");
    }

    if let Err(err) = run() {
        eprintln!("redesocial: {err}");
        std::process::exit(1);
    }
}

fn run() -> RegistryResult<()> {
    let accounts = Arc::new(AccountRegistry::new());
    let posts = PostRegistry::new(Arc::clone(&accounts));
    let demo = demo::seed(&accounts, &posts)?;
    info!(
        "event=demo_seed module=cli status=ok accounts={} posts={}",
        accounts.len(),
        posts.len()
    );

    let carlos = accounts.authenticate("carlos.m", &demo::encode_secret("senhaCarlos123"))?;
    println!("signed in as {}", carlos.name);

    for viewer in [demo.carlos, demo.fernanda, demo.ricardo] {
        print_feed(&accounts, &posts, viewer)?;
    }

    println!("redesocial_core version={}", redesocial_core::core_version());
    Ok(())
}

fn print_feed(
    accounts: &AccountRegistry,
    posts: &PostRegistry,
    viewer: AccountId,
) -> RegistryResult<()> {
    let owner = accounts.find_by_id(viewer)?;
    println!("\n== feed of @{} ==", owner.username);
    for post in posts.feed(viewer)? {
        let author = accounts
            .find_by_id(post.author)
            .map(|account| account.name)
            .unwrap_or_else(|_| format!("account {}", post.author));
        println!(
            "[{}] {author}: {}",
            redesocial_core::model::format_timestamp(&post.published_at),
            post.content
        );
        println!(
            "   likes: {} | comments: {}",
            post.like_count(),
            post.comments.len()
        );
        for comment in &post.comments {
            let commenter = accounts
                .find_by_id(comment.author)
                .map(|account| account.username)
                .unwrap_or_else(|_| comment.author.to_string());
            println!("   @{commenter}: {}", comment.content);
        }
    }
    Ok(())
}
