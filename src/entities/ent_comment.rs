// EntComment - replies to a post, immutable once written

use serde::Serialize;
use sqlx::FromRow;

use super::{current_timestamp, Post, User};
use crate::database::SocialDatabase;
use crate::ent_framework::{Entity, KeyedEntity, Projection};
use crate::error::AppResult;
use crate::models::EntityType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub comment_text: String,
    pub created_at: String,
    pub author_id: i64,
    pub post_id: i64,
}

impl Entity for Comment {
    const COLUMNS: &'static str =
        r#""id", "comment_text", "created_at", "author_id", "post_id""#;

    fn entity_type() -> EntityType {
        EntityType::Comment
    }

    fn serialize(&self) -> Projection {
        let mut map = Projection::new();
        map.insert("id".into(), self.id.into());
        map.insert("comment_text".into(), self.comment_text.clone().into());
        map.insert("created_at".into(), self.created_at.clone().into());
        map.insert("author_id".into(), self.author_id.into());
        map.insert("post_id".into(), self.post_id.into());
        map
    }
}

impl KeyedEntity for Comment {}

impl Comment {
    pub async fn author(&self, db: &SocialDatabase) -> AppResult<User> {
        User::gen_enforce(db, self.author_id).await
    }

    pub async fn post(&self, db: &SocialDatabase) -> AppResult<Post> {
        Post::gen_enforce(db, self.post_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub comment_text: String,
    pub author_id: i64,
    pub post_id: i64,
    pub created_at: Option<String>,
}

impl NewComment {
    pub fn new(author_id: i64, post_id: i64, comment_text: impl Into<String>) -> Self {
        Self {
            comment_text: comment_text.into(),
            author_id,
            post_id,
            created_at: None,
        }
    }

    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub async fn insert(&self, db: &SocialDatabase) -> AppResult<Comment> {
        let created_at = self.created_at.clone().unwrap_or_else(current_timestamp);

        let id = sqlx::query(
            r#"INSERT INTO "comment" ("comment_text", "created_at", "author_id", "post_id") VALUES (?, ?, ?, ?)"#,
        )
        .bind(&self.comment_text)
        .bind(&created_at)
        .bind(self.author_id)
        .bind(self.post_id)
        .execute(db.pool())
        .await?
        .last_insert_rowid();

        tracing::debug!(id, post_id = self.post_id, author_id = self.author_id, "created comment");
        Comment::gen_enforce(db, id).await
    }
}
