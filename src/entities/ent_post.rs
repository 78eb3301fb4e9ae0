// EntPost - user-authored messages

use serde::Serialize;
use sqlx::FromRow;

use super::{current_timestamp, Comment, Media, User};
use crate::database::SocialDatabase;
use crate::ent_framework::{Entity, KeyedEntity, Projection};
use crate::error::{AppError, AppResult};
use crate::models::EntityType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub created_at: String,
    pub author_id: i64,
}

impl Entity for Post {
    const COLUMNS: &'static str = r#""id", "content", "created_at", "author_id""#;

    fn entity_type() -> EntityType {
        EntityType::Post
    }

    fn serialize(&self) -> Projection {
        let mut map = Projection::new();
        map.insert("id".into(), self.id.into());
        map.insert("content".into(), self.content.clone().into());
        map.insert("created_at".into(), self.created_at.clone().into());
        map.insert("author_id".into(), self.author_id.into());
        map
    }
}

impl KeyedEntity for Post {}

impl Post {
    /// Replace the text of a post. Author and creation time are never rewritten.
    pub async fn update_content(
        db: &SocialDatabase,
        id: i64,
        content: &str,
    ) -> AppResult<Post> {
        let result = sqlx::query(r#"UPDATE "post" SET "content" = ? WHERE "id" = ?"#)
            .bind(content)
            .bind(id)
            .execute(db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("post with id {} not found", id)));
        }
        tracing::debug!(id, "updated post content");
        Post::gen_enforce(db, id).await
    }

    pub async fn author(&self, db: &SocialDatabase) -> AppResult<User> {
        User::gen_enforce(db, self.author_id).await
    }

    pub async fn media(&self, db: &SocialDatabase) -> AppResult<Vec<Media>> {
        Media::gen_where(db, "post_id", self.id).await
    }

    pub async fn comments(&self, db: &SocialDatabase) -> AppResult<Vec<Comment>> {
        Comment::gen_where(db, "post_id", self.id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub author_id: i64,
    /// Defaults to the current time when unset
    pub created_at: Option<String>,
}

impl NewPost {
    pub fn new(author_id: i64, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author_id,
            created_at: None,
        }
    }

    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub async fn insert(&self, db: &SocialDatabase) -> AppResult<Post> {
        let created_at = self.created_at.clone().unwrap_or_else(current_timestamp);

        let id = sqlx::query(
            r#"INSERT INTO "post" ("content", "created_at", "author_id") VALUES (?, ?, ?)"#,
        )
        .bind(&self.content)
        .bind(&created_at)
        .bind(self.author_id)
        .execute(db.pool())
        .await?
        .last_insert_rowid();

        tracing::debug!(id, author_id = self.author_id, "created post");
        Post::gen_enforce(db, id).await
    }
}
