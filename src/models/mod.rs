// Entity type system - one variant per persisted table

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Post,
    Media,
    Comment,
    Follower,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::User,
        EntityType::Post,
        EntityType::Media,
        EntityType::Comment,
        EntityType::Follower,
    ];

    /// Table name in the relational store.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Post => "post",
            EntityType::Media => "media",
            EntityType::Comment => "comment",
            EntityType::Follower => "follower",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
