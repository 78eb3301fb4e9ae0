// EntUser - registered accounts

use serde::Serialize;
use sqlx::FromRow;

use super::{Follower, Post};
use crate::database::SocialDatabase;
use crate::ent_framework::{Entity, KeyedEntity, Projection};
use crate::error::{AppError, AppResult};
use crate::models::EntityType;

#[derive(Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_active: bool,
}

impl Entity for User {
    const COLUMNS: &'static str =
        r#""id", "username", "firstname", "lastname", "email", "password", "is_active""#;

    fn entity_type() -> EntityType {
        EntityType::User
    }

    fn serialize(&self) -> Projection {
        let mut map = Projection::new();
        map.insert("id".into(), self.id.into());
        map.insert("username".into(), self.username.clone().into());
        map.insert("firstname".into(), self.firstname.clone().into());
        map.insert("lastname".into(), self.lastname.clone().into());
        map.insert("email".into(), self.email.clone().into());
        map.insert("is_active".into(), self.is_active.into());
        map
    }
}

impl KeyedEntity for User {}

impl User {
    pub async fn gen_by_username(db: &SocialDatabase, username: &str) -> AppResult<Option<User>> {
        let sql = format!(
            r#"SELECT {} FROM "user" WHERE "username" = ?"#,
            Self::COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db.pool())
            .await?;
        Ok(user)
    }

    /// Flip the active flag; deactivation keeps the row and everything it owns
    pub async fn set_active(db: &SocialDatabase, id: i64, active: bool) -> AppResult<()> {
        let result = sqlx::query(r#"UPDATE "user" SET "is_active" = ? WHERE "id" = ?"#)
            .bind(active)
            .bind(id)
            .execute(db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user with id {} not found", id)));
        }
        tracing::info!(id, active, "changed user active flag");
        Ok(())
    }

    pub async fn posts(&self, db: &SocialDatabase) -> AppResult<Vec<Post>> {
        Post::gen_where(db, "author_id", self.id).await
    }

    /// Edges pointing at this user
    pub async fn followers(&self, db: &SocialDatabase) -> AppResult<Vec<Follower>> {
        Follower::gen_where(db, "user_to_id", self.id).await
    }

    /// Edges starting at this user
    pub async fn following(&self, db: &SocialDatabase) -> AppResult<Vec<Follower>> {
        Follower::gen_where(db, "user_from_id", self.id).await
    }
}

/// Registration payload. `is_active` is left to the column default.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub async fn insert(&self, db: &SocialDatabase) -> AppResult<User> {
        let id = sqlx::query(
            r#"INSERT INTO "user" ("username", "firstname", "lastname", "email", "password") VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&self.username)
        .bind(&self.firstname)
        .bind(&self.lastname)
        .bind(&self.email)
        .bind(&self.password)
        .execute(db.pool())
        .await?
        .last_insert_rowid();

        tracing::debug!(id, username = %self.username, "created user");
        User::gen_enforce(db, id).await
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            firstname: "Alice".to_string(),
            lastname: "Liddell".to_string(),
            email: "a@x.com".to_string(),
            password: "s3cret".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_serialize_excludes_password_and_collections() {
        let projection = Entity::serialize(&alice());

        let mut keys: Vec<&str> = projection.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["email", "firstname", "id", "is_active", "lastname", "username"]
        );
        assert!(!projection.values().any(|v| v == "s3cret"));
        assert_eq!(projection["is_active"], serde_json::json!(true));
    }

    #[test]
    fn test_serde_output_matches_projection() {
        let user = alice();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value, serde_json::Value::Object(Entity::serialize(&user)));
    }

    #[test]
    fn test_user_debug_hides_password() {
        let rendered = format!("{:?}", alice());
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("alice"));
    }

    #[test]
    fn test_new_user_debug_hides_password() {
        let payload = NewUser::new("alice", "Alice", "Liddell", "a@x.com", "s3cret");
        assert!(!format!("{:?}", payload).contains("s3cret"));
    }
}
