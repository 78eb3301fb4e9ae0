// EntFollower - directed follow edges keyed by (user_from_id, user_to_id)

use serde::Serialize;
use sqlx::FromRow;

use super::User;
use crate::database::SocialDatabase;
use crate::ent_framework::{Entity, KeyedEntity, Projection};
use crate::error::AppResult;
use crate::models::EntityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, FromRow)]
pub struct Follower {
    pub user_from_id: i64,
    pub user_to_id: i64,
}

impl Entity for Follower {
    const COLUMNS: &'static str = r#""user_from_id", "user_to_id""#;
    const ORDER_BY: &'static str = r#""user_from_id", "user_to_id""#;

    fn entity_type() -> EntityType {
        EntityType::Follower
    }

    fn serialize(&self) -> Projection {
        let mut map = Projection::new();
        map.insert("user_from_id".into(), self.user_from_id.into());
        map.insert("user_to_id".into(), self.user_to_id.into());
        map
    }
}

impl Follower {
    pub async fn gen_nullable(
        db: &SocialDatabase,
        user_from_id: i64,
        user_to_id: i64,
    ) -> AppResult<Option<Follower>> {
        let edge = sqlx::query_as::<_, Follower>(
            r#"SELECT "user_from_id", "user_to_id" FROM "follower" WHERE "user_from_id" = ? AND "user_to_id" = ?"#,
        )
        .bind(user_from_id)
        .bind(user_to_id)
        .fetch_optional(db.pool())
        .await?;
        Ok(edge)
    }

    /// Unfollow. Returns whether the edge existed.
    pub async fn delete(db: &SocialDatabase, user_from_id: i64, user_to_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"DELETE FROM "follower" WHERE "user_from_id" = ? AND "user_to_id" = ?"#,
        )
        .bind(user_from_id)
        .bind(user_to_id)
        .execute(db.pool())
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::debug!(user_from_id, user_to_id, "removed follow edge");
        }
        Ok(removed)
    }

    pub async fn user_from(&self, db: &SocialDatabase) -> AppResult<User> {
        User::gen_enforce(db, self.user_from_id).await
    }

    pub async fn user_to(&self, db: &SocialDatabase) -> AppResult<User> {
        User::gen_enforce(db, self.user_to_id).await
    }
}

/// Follow request. A repeated pair is rejected by the composite primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFollower {
    pub user_from_id: i64,
    pub user_to_id: i64,
}

impl NewFollower {
    pub fn new(user_from_id: i64, user_to_id: i64) -> Self {
        Self {
            user_from_id,
            user_to_id,
        }
    }

    pub async fn insert(&self, db: &SocialDatabase) -> AppResult<Follower> {
        sqlx::query(r#"INSERT INTO "follower" ("user_from_id", "user_to_id") VALUES (?, ?)"#)
            .bind(self.user_from_id)
            .bind(self.user_to_id)
            .execute(db.pool())
            .await?;

        tracing::debug!(
            user_from_id = self.user_from_id,
            user_to_id = self.user_to_id,
            "created follow edge"
        );
        Ok(Follower {
            user_from_id: self.user_from_id,
            user_to_id: self.user_to_id,
        })
    }
}
