// Ent Framework - declarative schema definitions and the entity traits built on them

pub mod ent_schema;
pub mod ent_trait;

pub use ent_schema::*;
pub use ent_trait::{Entity, KeyedEntity, Projection};
