// User Entity Schema - registered accounts and their side of the social graph

use crate::ent_framework::{EdgeDefinition, EntSchema, FieldDefault, FieldDefinition, FieldType};
use crate::models::EntityType;

pub struct UserSchema;

impl EntSchema for UserSchema {
    fn entity_type() -> EntityType {
        EntityType::User
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("id", FieldType::Integer).immutable(),
            FieldDefinition::new("username", FieldType::String)
                .unique()
                .max_length(50),
            FieldDefinition::new("firstname", FieldType::String).max_length(50),
            FieldDefinition::new("lastname", FieldType::String).max_length(50),
            FieldDefinition::new("email", FieldType::String)
                .unique()
                .max_length(120),
            // Stored as given; hashing belongs to the caller.
            FieldDefinition::new("password", FieldType::String),
            FieldDefinition::new("is_active", FieldType::Bool)
                .default_value(FieldDefault::Bool(true)),
        ]
    }

    fn edges() -> Vec<EdgeDefinition> {
        vec![
            EdgeDefinition::to("posts", EntityType::Post, "author_id").inverse("author"),
            // Edges where this user is the followed party
            EdgeDefinition::to("followers", EntityType::Follower, "user_to_id").inverse("user_to"),
            // Edges where this user is the follower
            EdgeDefinition::to("following", EntityType::Follower, "user_from_id")
                .inverse("user_from"),
        ]
    }
}
