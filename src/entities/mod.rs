// Entities - row types for every table, their insert payloads and relationship lookups

use chrono::{SecondsFormat, Utc};

pub mod ent_comment;
pub mod ent_follower;
pub mod ent_media;
pub mod ent_post;
pub mod ent_user;

pub use ent_comment::{Comment, NewComment};
pub use ent_follower::{Follower, NewFollower};
pub use ent_media::{Media, NewMedia};
pub use ent_post::{NewPost, Post};
pub use ent_user::{NewUser, User};

/// Default `created_at` value: RFC 3339 in UTC with second precision
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
