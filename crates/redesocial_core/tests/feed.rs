use chrono::{DateTime, Duration, TimeZone, Utc};
use redesocial_core::{
    AccountDraft, AccountId, AccountRegistry, ErrorKind, Post, PostDraft, PostId, PostRegistry,
};
use std::sync::Arc;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn register(accounts: &AccountRegistry, handle: &str) -> AccountId {
    accounts
        .register(AccountDraft::new(
            handle.to_uppercase(),
            handle,
            format!("{handle}@email.com"),
            "secret1",
        ))
        .unwrap()
        .id
}

fn publish(posts: &PostRegistry, author: AccountId, minutes: i64) -> PostId {
    posts
        .create(
            PostDraft::new(author, format!("post at +{minutes}m"))
                .published_at(base_time() + Duration::minutes(minutes)),
        )
        .unwrap()
        .id
}

fn ids(feed: &[Post]) -> Vec<PostId> {
    feed.iter().map(|post| post.id).collect()
}

#[test]
fn feed_contains_own_and_friend_posts_newest_first() {
    let accounts = Arc::new(AccountRegistry::new());
    let posts = PostRegistry::new(Arc::clone(&accounts));
    let x = register(&accounts, "xavier");
    let y = register(&accounts, "yara");
    let z = register(&accounts, "zeca");

    let x_old = publish(&posts, x, 0);
    let y_mid = publish(&posts, y, 10);
    let z_new = publish(&posts, z, 20);
    let y_new = publish(&posts, y, 30);

    assert_eq!(ids(&posts.feed(x).unwrap()), vec![x_old]);

    accounts.add_friendship(x, y).unwrap();
    let feed = posts.feed(x).unwrap();
    assert_eq!(ids(&feed), vec![y_new, y_mid, x_old]);
    assert!(!ids(&feed).contains(&z_new));
    assert!(feed
        .windows(2)
        .all(|pair| pair[0].published_at >= pair[1].published_at));

    let y_feed = posts.feed(y).unwrap();
    assert_eq!(ids(&y_feed), vec![y_new, y_mid, x_old]);
}

#[test]
fn feed_ties_keep_creation_order() {
    let accounts = Arc::new(AccountRegistry::new());
    let posts = PostRegistry::new(Arc::clone(&accounts));
    let x = register(&accounts, "xavier");
    let y = register(&accounts, "yara");
    accounts.add_friendship(x, y).unwrap();

    let first = publish(&posts, y, 5);
    let second = publish(&posts, x, 5);
    let third = publish(&posts, y, 5);
    let newest = publish(&posts, x, 6);

    assert_eq!(
        ids(&posts.feed(x).unwrap()),
        vec![newest, first, second, third]
    );
}

#[test]
fn feed_follows_current_friendships() {
    let accounts = Arc::new(AccountRegistry::new());
    let posts = PostRegistry::new(Arc::clone(&accounts));
    let x = register(&accounts, "xavier");
    let y = register(&accounts, "yara");
    let y_post = publish(&posts, y, 1);

    accounts.add_friendship(x, y).unwrap();
    assert_eq!(ids(&posts.feed(x).unwrap()), vec![y_post]);

    accounts.remove_friendship(y, x).unwrap();
    assert!(posts.feed(x).unwrap().is_empty());
}

#[test]
fn feed_for_unknown_viewer_is_not_found() {
    let accounts = Arc::new(AccountRegistry::new());
    let posts = PostRegistry::new(accounts);
    let err = posts.feed(AccountId::new(3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
