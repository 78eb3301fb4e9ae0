// Social schema - relational data model for users, posts, media, comments and follows

// Ent Framework - declarative schema definitions and entity traits
pub mod ent_framework;

// DDL generation from registered schemas
pub mod codegen;

// Entity type system
pub mod models;

// Schema definitions - one per table
pub mod schemas;

// Row types, insert payloads and relationship lookups
pub mod entities;

// Store access
pub mod database;

// Common utilities
pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use database::SocialDatabase;
pub use ent_framework::{Entity, KeyedEntity, Projection};
pub use entities::{
    Comment, Follower, Media, NewComment, NewFollower, NewMedia, NewPost, NewUser, Post, User,
};
pub use error::{AppError, AppResult, ConstraintKind};
pub use models::EntityType;
