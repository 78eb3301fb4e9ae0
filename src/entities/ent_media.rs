// EntMedia - attachments bound to a post

use serde::Serialize;
use sqlx::FromRow;

use super::Post;
use crate::database::SocialDatabase;
use crate::ent_framework::{Entity, KeyedEntity, Projection};
use crate::error::AppResult;
use crate::models::EntityType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Media {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub post_id: i64,
}

impl Entity for Media {
    const COLUMNS: &'static str = r#""id", "type", "url", "post_id""#;

    fn entity_type() -> EntityType {
        EntityType::Media
    }

    fn serialize(&self) -> Projection {
        let mut map = Projection::new();
        map.insert("id".into(), self.id.into());
        map.insert("type".into(), self.media_type.clone().into());
        map.insert("url".into(), self.url.clone().into());
        map.insert("post_id".into(), self.post_id.into());
        map
    }
}

impl KeyedEntity for Media {}

impl Media {
    pub async fn post(&self, db: &SocialDatabase) -> AppResult<Post> {
        Post::gen_enforce(db, self.post_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedia {
    pub media_type: String,
    pub url: String,
    pub post_id: i64,
}

impl NewMedia {
    pub fn new(post_id: i64, media_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            url: url.into(),
            post_id,
        }
    }

    pub async fn insert(&self, db: &SocialDatabase) -> AppResult<Media> {
        let id = sqlx::query(r#"INSERT INTO "media" ("type", "url", "post_id") VALUES (?, ?, ?)"#)
            .bind(&self.media_type)
            .bind(&self.url)
            .bind(self.post_id)
            .execute(db.pool())
            .await?
            .last_insert_rowid();

        tracing::debug!(id, post_id = self.post_id, "created media");
        Media::gen_enforce(db, id).await
    }
}
