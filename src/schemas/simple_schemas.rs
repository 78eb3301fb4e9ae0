// Schema definitions for the smaller entities: media, comments and follow edges

use crate::ent_framework::{
    EdgeDefinition, EntSchema, FieldDefinition, FieldType, IndexDefinition,
};
use crate::models::EntityType;

/// Attachment bound to a post
pub struct MediaSchema;

impl EntSchema for MediaSchema {
    fn entity_type() -> EntityType {
        EntityType::Media
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("id", FieldType::Integer).immutable(),
            // Free-form classification such as "image" or "video"
            FieldDefinition::new("type", FieldType::String).max_length(50),
            FieldDefinition::new("url", FieldType::String).max_length(255),
            FieldDefinition::new("post_id", FieldType::Integer).references(EntityType::Post, "id"),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![EdgeDefinition::from("post", EntityType::Post, "post_id").inverse("media")]
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("idx_media_post_id", vec!["post_id"])]
    }
}

/// Reply to a post; never updated once written
pub struct CommentSchema;

impl EntSchema for CommentSchema {
    fn entity_type() -> EntityType {
        EntityType::Comment
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("id", FieldType::Integer).immutable(),
            FieldDefinition::new("comment_text", FieldType::String)
                .max_length(280)
                .immutable(),
            FieldDefinition::new("created_at", FieldType::String)
                .max_length(50)
                .immutable(),
            FieldDefinition::new("author_id", FieldType::Integer)
                .references(EntityType::User, "id")
                .immutable(),
            FieldDefinition::new("post_id", FieldType::Integer)
                .references(EntityType::Post, "id")
                .immutable(),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            // Users expose no comment collection, so this edge has no inverse.
            EdgeDefinition::from("author", EntityType::User, "author_id"),
            EdgeDefinition::from("post", EntityType::Post, "post_id").inverse("comments"),
        ]
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![
            IndexDefinition::new("idx_comment_post_id", vec!["post_id"]),
            IndexDefinition::new("idx_comment_author_id", vec!["author_id"]),
        ]
    }
}

/// Directed follow edge keyed by the ordered (follower, followed) pair
pub struct FollowerSchema;

impl EntSchema for FollowerSchema {
    fn entity_type() -> EntityType {
        EntityType::Follower
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("user_from_id", FieldType::Integer)
                .references(EntityType::User, "id")
                .immutable(),
            FieldDefinition::new("user_to_id", FieldType::Integer)
                .references(EntityType::User, "id")
                .immutable(),
        ]
    }

    fn primary_key() -> Vec<&'static str> {
        vec!["user_from_id", "user_to_id"]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("user_from", EntityType::User, "user_from_id")
                .inverse("following"),
            EdgeDefinition::from("user_to", EntityType::User, "user_to_id").inverse("followers"),
        ]
    }

    fn indexes() -> Vec<IndexDefinition> {
        // user_from_id is already the leading primary key column
        vec![IndexDefinition::new("idx_follower_user_to_id", vec!["user_to_id"])]
    }
}
