use social_schema::{
    AppError, ConstraintKind, Entity, KeyedEntity, NewComment, NewFollower, NewMedia, NewPost,
    NewUser, Post, SocialDatabase, User,
};

async fn setup() -> (SocialDatabase, User, User) {
    let db = SocialDatabase::new_in_memory().await.unwrap();
    let alice = NewUser::new("alice", "Alice", "Liddell", "a@x.com", "pw")
        .insert(&db)
        .await
        .unwrap();
    let bob = NewUser::new("bob", "Bob", "Builder", "b@x.com", "pw")
        .insert(&db)
        .await
        .unwrap();
    (db, alice, bob)
}

fn kind(err: AppError) -> Option<ConstraintKind> {
    err.constraint_kind()
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (db, _, _) = setup().await;
    let err = NewUser::new("alice", "Other", "Person", "other@x.com", "pw")
        .insert(&db)
        .await
        .unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let (db, _, _) = setup().await;
    let err = NewUser::new("carol", "Carol", "Singer", "b@x.com", "pw")
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::Unique));
    assert_eq!(User::gen_all(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_length_limits_are_enforced_by_the_store() {
    let (db, alice, _) = setup().await;

    let err = NewUser::new("x".repeat(51), "A", "B", "long@x.com", "pw")
        .insert(&db)
        .await
        .unwrap_err();
    assert!(err.is_check_violation(), "unexpected error: {}", err);

    // Exactly at the limit is fine, and the limit counts characters
    NewUser::new("é".repeat(50), "A", "B", "edge@x.com", "pw")
        .insert(&db)
        .await
        .unwrap();

    let err = NewPost::new(alice.id, "a".repeat(281))
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::Check));

    let post = NewPost::new(alice.id, "a".repeat(280)).insert(&db).await.unwrap();
    let err = Post::update_content(&db, post.id, &"b".repeat(281))
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::Check));
    assert_eq!(
        Post::gen_enforce(&db, post.id).await.unwrap().content,
        "a".repeat(280)
    );

    let err = NewMedia::new(post.id, "image", format!("https://x/{}", "p".repeat(300)))
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::Check));
}

#[tokio::test]
async fn test_dangling_references_are_rejected() {
    let (db, alice, _) = setup().await;

    let err = NewPost::new(9_999, "orphan").insert(&db).await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "unexpected error: {}", err);

    let err = NewMedia::new(9_999, "image", "https://x/a.png")
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));

    let post = NewPost::new(alice.id, "hi").insert(&db).await.unwrap();
    let err = NewComment::new(9_999, post.id, "who am i")
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));

    let err = NewComment::new(alice.id, 9_999, "on nothing")
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));

    let err = NewFollower::new(alice.id, 9_999)
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));
}

#[tokio::test]
async fn test_duplicate_follow_pair_is_rejected() {
    let (db, alice, bob) = setup().await;

    NewFollower::new(alice.id, bob.id).insert(&db).await.unwrap();
    let err = NewFollower::new(alice.id, bob.id)
        .insert(&db)
        .await
        .unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {}", err);

    // The reverse direction is a different edge
    NewFollower::new(bob.id, alice.id).insert(&db).await.unwrap();
}

#[tokio::test]
async fn test_self_follow_is_allowed() {
    let (db, alice, _) = setup().await;
    NewFollower::new(alice.id, alice.id).insert(&db).await.unwrap();

    let following = alice.following(&db).await.unwrap();
    let followers = alice.followers(&db).await.unwrap();
    assert_eq!(following, followers);
}

#[tokio::test]
async fn test_delete_does_not_cascade() {
    let (db, alice, bob) = setup().await;
    let post = NewPost::new(alice.id, "hi").insert(&db).await.unwrap();
    let comment = NewComment::new(bob.id, post.id, "hey").insert(&db).await.unwrap();

    let err = User::delete(&db, alice.id).await.unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));
    let err = Post::delete(&db, post.id).await.unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));

    // Removing dependents first lets the delete through
    assert!(social_schema::Comment::delete(&db, comment.id).await.unwrap());
    assert!(Post::delete(&db, post.id).await.unwrap());
    assert!(User::delete(&db, alice.id).await.unwrap());
    assert!(!User::exists(&db, alice.id).await.unwrap());
}

#[tokio::test]
async fn test_followed_user_cannot_be_deleted_while_edge_exists() {
    let (db, alice, bob) = setup().await;
    NewFollower::new(alice.id, bob.id).insert(&db).await.unwrap();

    let err = User::delete(&db, bob.id).await.unwrap_err();
    assert_eq!(kind(err), Some(ConstraintKind::ForeignKey));

    social_schema::Follower::delete(&db, alice.id, bob.id)
        .await
        .unwrap();
    assert!(User::delete(&db, bob.id).await.unwrap());
}

#[tokio::test]
async fn test_immutable_columns_reject_rewrites() {
    let (db, alice, bob) = setup().await;
    let post = NewPost::new(alice.id, "hi").insert(&db).await.unwrap();

    let err: AppError = sqlx::query(r#"UPDATE "post" SET "author_id" = ? WHERE "id" = ?"#)
        .bind(bob.id)
        .bind(post.id)
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
    assert!(err.is_immutable_violation(), "unexpected error: {}", err);

    let err: AppError = sqlx::query(r#"UPDATE "post" SET "created_at" = 'x' WHERE "id" = ?"#)
        .bind(post.id)
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
    assert_eq!(kind(err), Some(ConstraintKind::Immutable));

    let comment = NewComment::new(bob.id, post.id, "hey").insert(&db).await.unwrap();
    let err: AppError = sqlx::query(r#"UPDATE "comment" SET "comment_text" = 'edited' WHERE "id" = ?"#)
        .bind(comment.id)
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
    assert!(err.is_immutable_violation(), "unexpected error: {}", err);

    let stored = Post::gen_enforce(&db, post.id).await.unwrap();
    assert_eq!(stored.author_id, alice.id);
    assert_eq!(stored.created_at, post.created_at);

    // Editable columns and same-value writes still go through
    Post::update_content(&db, post.id, "edited").await.unwrap();
    sqlx::query(r#"UPDATE "post" SET "author_id" = ? WHERE "id" = ?"#)
        .bind(alice.id)
        .bind(post.id)
        .execute(db.pool())
        .await
        .unwrap();
}
