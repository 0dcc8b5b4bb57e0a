use chrono::{Duration, TimeZone, Utc};
use redesocial_core::{
    Account, AccountDraft, AccountId, AccountRegistry, CommentDraft, CommentId, Conflict,
    ErrorKind, NotFound, PostDraft, PostId, PostRegistry, RegistryError, StoreLimits,
    ValidationError,
};
use std::sync::Arc;

struct Fixture {
    accounts: Arc<AccountRegistry>,
    posts: PostRegistry,
    carlos: Account,
    fernanda: Account,
}

fn setup() -> Fixture {
    let accounts = Arc::new(AccountRegistry::new());
    let carlos = accounts
        .register(AccountDraft::new(
            "Carlos Mendes",
            "carlos.m",
            "carlos.mendes@email.com",
            "senhaCarlos123",
        ))
        .unwrap();
    let fernanda = accounts
        .register(AccountDraft::new(
            "Fernanda Costa",
            "fernanda.c",
            "fernanda.costa@email.com",
            "senhaFernanda456",
        ))
        .unwrap();
    let posts = PostRegistry::new(Arc::clone(&accounts));
    Fixture {
        accounts,
        posts,
        carlos,
        fernanda,
    }
}

#[test]
fn create_assigns_identity_and_starts_empty() {
    let fx = setup();
    let post = fx
        .posts
        .create(PostDraft::new(
            fx.carlos.id,
            "Hoje é um ótimo dia para aprender algo novo!",
        ))
        .unwrap();

    assert_eq!(post.id, PostId::new(1));
    assert_eq!(post.author, fx.carlos.id);
    assert!(post.likes.is_empty());
    assert!(post.comments.is_empty());
    assert_eq!(fx.posts.find_by_id(post.id).unwrap(), post);
    assert_eq!(
        fx.accounts.find_by_id(fx.carlos.id).unwrap().posts,
        vec![post.id]
    );
}

#[test]
fn create_enforces_content_and_author_rules() {
    let fx = setup();

    let blank = fx
        .posts
        .create(PostDraft::new(fx.carlos.id, "   "))
        .unwrap_err();
    assert_eq!(blank, RegistryError::Validation(ValidationError::EmptyContent));

    let long = fx
        .posts
        .create(PostDraft::new(fx.carlos.id, "a".repeat(281)))
        .unwrap_err();
    assert_eq!(
        long,
        RegistryError::Validation(ValidationError::ContentTooLong {
            max: 280,
            actual: 281
        })
    );

    let unknown = fx
        .posts
        .create(PostDraft::new(AccountId::new(77), "hello"))
        .unwrap_err();
    assert_eq!(
        unknown,
        RegistryError::Validation(ValidationError::UnknownAuthor(AccountId::new(77)))
    );

    let zero = fx
        .posts
        .create(PostDraft::new(AccountId::new(0), "hello"))
        .unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::Validation);

    assert!(fx.posts.is_empty());
    assert_eq!(fx.posts.next_id(), PostId::new(1));
}

#[test]
fn content_limit_counts_characters_after_trim() {
    let fx = setup();
    let padded = format!("  {}  ", "é".repeat(280));
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, padded)).unwrap();
    assert_eq!(post.content.chars().count(), 280);

    let limited = {
        let accounts = Arc::new(
            AccountRegistry::with_limits(StoreLimits {
                max_post_chars: 5,
                ..StoreLimits::default()
            })
            .unwrap(),
        );
        let author = accounts
            .register(AccountDraft::new("Ana", "ana", "ana@email.com", "secret1"))
            .unwrap();
        PostRegistry::new(accounts)
            .create(PostDraft::new(author.id, "toolong"))
            .unwrap_err()
    };
    assert!(matches!(
        limited,
        RegistryError::Validation(ValidationError::ContentTooLong { max: 5, .. })
    ));
}

#[test]
fn validate_checks_standalone_post() {
    let fx = setup();
    let mut post = fx
        .posts
        .create(PostDraft::new(fx.carlos.id, "valid"))
        .unwrap();
    assert!(fx.posts.validate(&post).is_ok());

    post.author = AccountId::new(99);
    assert_eq!(
        fx.posts.validate(&post).unwrap_err(),
        RegistryError::Validation(ValidationError::UnknownAuthor(AccountId::new(99)))
    );
}

#[test]
fn list_all_and_by_author_keep_creation_order() {
    let fx = setup();
    let first = fx.posts.create(PostDraft::new(fx.carlos.id, "one")).unwrap();
    let second = fx
        .posts
        .create(PostDraft::new(fx.fernanda.id, "two"))
        .unwrap();
    let third = fx.posts.create(PostDraft::new(fx.carlos.id, "three")).unwrap();

    let all: Vec<PostId> = fx.posts.list_all().iter().map(|post| post.id).collect();
    assert_eq!(all, vec![first.id, second.id, third.id]);

    let by_carlos: Vec<PostId> = fx
        .posts
        .list_by_author(fx.carlos.id)
        .unwrap()
        .iter()
        .map(|post| post.id)
        .collect();
    assert_eq!(by_carlos, vec![first.id, third.id]);
}

#[test]
fn list_by_author_without_posts_is_not_found() {
    let fx = setup();
    let err = fx.posts.list_by_author(fx.fernanda.id).unwrap_err();
    assert_eq!(
        err,
        RegistryError::NotFound(NotFound::PostsByAuthor(fx.fernanda.id))
    );
}

#[test]
fn like_is_set_valued_and_rejects_duplicates() {
    let fx = setup();
    let post = fx
        .posts
        .create(PostDraft::new(
            fx.carlos.id,
            "Hoje é um ótimo dia para aprender algo novo!",
        ))
        .unwrap();

    fx.posts.like(post.id, fx.fernanda.id).unwrap();
    assert_eq!(fx.posts.likes_of(post.id).unwrap(), vec![fx.fernanda.id]);

    let err = fx.posts.like(post.id, fx.fernanda.id).unwrap_err();
    assert_eq!(
        err,
        RegistryError::Conflict(Conflict::AlreadyLiked {
            post: post.id,
            account: fx.fernanda.id,
        })
    );
    assert_eq!(fx.posts.likes_of(post.id).unwrap(), vec![fx.fernanda.id]);
}

#[test]
fn like_then_unlike_restores_previous_set() {
    let fx = setup();
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, "hi")).unwrap();
    fx.posts.like(post.id, fx.carlos.id).unwrap();
    let before = fx.posts.find_by_id(post.id).unwrap().likes;

    fx.posts.like(post.id, fx.fernanda.id).unwrap();
    fx.posts.unlike(post.id, fx.fernanda.id).unwrap();
    assert_eq!(fx.posts.find_by_id(post.id).unwrap().likes, before);

    let err = fx.posts.unlike(post.id, fx.fernanda.id).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Conflict(Conflict::NotLiked { .. })
    ));
}

#[test]
fn like_resolves_post_and_account() {
    let fx = setup();
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, "hi")).unwrap();

    assert_eq!(
        fx.posts.like(PostId::new(9), fx.carlos.id).unwrap_err(),
        RegistryError::NotFound(NotFound::Post(PostId::new(9)))
    );
    assert_eq!(
        fx.posts.like(post.id, AccountId::new(9)).unwrap_err(),
        RegistryError::NotFound(NotFound::Account(AccountId::new(9)))
    );
    assert_eq!(
        fx.posts.unlike(post.id, AccountId::new(9)).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(fx.posts.likes_of(post.id).unwrap().is_empty());
}

#[test]
fn comments_append_in_order_with_own_identities() {
    let fx = setup();
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, "hi")).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    let first = fx
        .posts
        .add_comment(
            CommentDraft::new(fx.fernanda.id, "Adorei sua energia, Carlos!")
                .on_post(post.id)
                .created_at(at),
        )
        .unwrap();
    let second = fx
        .posts
        .add_comment(
            CommentDraft::new(fx.fernanda.id, "Adorei sua energia, Carlos!")
                .on_post(post.id)
                .created_at(at + Duration::minutes(1)),
        )
        .unwrap();

    assert_eq!(first.id, CommentId::new(1));
    assert_eq!(second.id, CommentId::new(2));
    assert_eq!(first.post, post.id);
    let stored = fx.posts.comments_of(post.id).unwrap();
    assert_eq!(stored, vec![first, second]);
}

#[test]
fn add_comment_rejects_missing_or_unknown_references() {
    let fx = setup();
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, "hi")).unwrap();

    let detached = fx
        .posts
        .add_comment(CommentDraft::new(fx.fernanda.id, "text"))
        .unwrap_err();
    assert_eq!(
        detached,
        RegistryError::Validation(ValidationError::MissingParentPost)
    );

    let missing_post = fx
        .posts
        .add_comment(CommentDraft::new(fx.fernanda.id, "text").on_post(PostId::new(5)))
        .unwrap_err();
    assert_eq!(
        missing_post,
        RegistryError::NotFound(NotFound::Post(PostId::new(5)))
    );

    let missing_author = fx
        .posts
        .add_comment(CommentDraft::new(AccountId::new(5), "text").on_post(post.id))
        .unwrap_err();
    assert_eq!(
        missing_author,
        RegistryError::NotFound(NotFound::Account(AccountId::new(5)))
    );

    let blank = fx
        .posts
        .add_comment(CommentDraft::new(fx.fernanda.id, "  ").on_post(post.id))
        .unwrap_err();
    assert_eq!(blank, RegistryError::Validation(ValidationError::EmptyComment));

    assert!(fx.posts.comments_of(post.id).unwrap().is_empty());
}

#[test]
fn delete_removes_post_and_author_reference() {
    let fx = setup();
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, "bye")).unwrap();
    fx.posts
        .add_comment(CommentDraft::new(fx.fernanda.id, "ok").on_post(post.id))
        .unwrap();

    assert!(fx.posts.delete(post.id).unwrap());
    assert_eq!(
        fx.posts.find_by_id(post.id).unwrap_err(),
        RegistryError::NotFound(NotFound::Post(post.id))
    );
    assert!(fx.accounts.find_by_id(fx.carlos.id).unwrap().posts.is_empty());
    assert_eq!(fx.posts.delete(post.id).unwrap_err().kind(), ErrorKind::NotFound);

    let next = fx.posts.create(PostDraft::new(fx.carlos.id, "again")).unwrap();
    assert_eq!(next.id, PostId::new(2));
}

#[test]
fn removing_author_keeps_orphaned_posts() {
    let fx = setup();
    fx.accounts
        .add_friendship(fx.carlos.id, fx.fernanda.id)
        .unwrap();
    let post = fx.posts.create(PostDraft::new(fx.carlos.id, "mine")).unwrap();
    fx.posts.like(post.id, fx.fernanda.id).unwrap();

    assert!(fx.accounts.remove(fx.carlos.id).unwrap());

    let kept = fx.posts.find_by_id(post.id).unwrap();
    assert_eq!(kept.author, fx.carlos.id);
    assert!(kept.is_liked_by(fx.fernanda.id));
    assert_eq!(fx.posts.list_by_author(fx.carlos.id).unwrap().len(), 1);
    assert_eq!(
        fx.accounts.find_by_id(kept.author).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        fx.posts.validate(&kept).unwrap_err(),
        RegistryError::Validation(ValidationError::UnknownAuthor(fx.carlos.id))
    );
}

#[test]
fn registries_can_be_shared_across_threads() {
    let fx = setup();
    let posts = Arc::new(fx.posts);
    let post = posts.create(PostDraft::new(fx.carlos.id, "threads")).unwrap();

    let likers: Vec<AccountId> = (0..8)
        .map(|idx| {
            fx.accounts
                .register(AccountDraft::new(
                    format!("User {idx}"),
                    format!("user{idx}"),
                    format!("user{idx}@email.com"),
                    "secret1",
                ))
                .unwrap()
                .id
        })
        .collect();

    let handles: Vec<_> = likers
        .iter()
        .map(|liker| {
            let posts = Arc::clone(&posts);
            let liker = *liker;
            std::thread::spawn(move || posts.like(post.id, liker))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(posts.find_by_id(post.id).unwrap().like_count(), likers.len());
}
