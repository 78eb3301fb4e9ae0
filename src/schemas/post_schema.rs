// Post Entity Schema - user-authored messages with media and comments hanging off them

use crate::ent_framework::{
    EdgeDefinition, EntSchema, FieldDefinition, FieldType, IndexDefinition,
};
use crate::models::EntityType;

pub struct PostSchema;

impl EntSchema for PostSchema {
    fn entity_type() -> EntityType {
        EntityType::Post
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("id", FieldType::Integer).immutable(),
            FieldDefinition::new("content", FieldType::String).max_length(280),
            FieldDefinition::new("created_at", FieldType::String)
                .max_length(50)
                .immutable(),
            FieldDefinition::new("author_id", FieldType::Integer)
                .references(EntityType::User, "id")
                .immutable(),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::from("author", EntityType::User, "author_id").inverse("posts"),
            EdgeDefinition::to("media", EntityType::Media, "post_id").inverse("post"),
            EdgeDefinition::to("comments", EntityType::Comment, "post_id").inverse("post"),
        ]
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("idx_post_author_id", vec!["author_id"])]
    }
}
