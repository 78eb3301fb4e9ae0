// Schema definitions module - centralized schema registry

pub mod post_schema;
pub mod simple_schemas;
pub mod user_schema;

use crate::ent_framework::SchemaRegistry;

pub use post_schema::PostSchema;
pub use simple_schemas::{CommentSchema, FollowerSchema, MediaSchema};
pub use user_schema::UserSchema;

/// Initialize and register all schemas, referenced tables first
pub fn create_schema_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry.register::<UserSchema>();
    registry.register::<PostSchema>();
    registry.register::<MediaSchema>();
    registry.register::<CommentSchema>();
    registry.register::<FollowerSchema>();

    registry
}
