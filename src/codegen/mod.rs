// Code generation from the schema registry

pub mod ddl_generator;

pub use ddl_generator::{quote_ident, DdlGenerator};

use crate::ent_framework::SchemaRegistry;

impl SchemaRegistry {
    /// Every statement needed to create the registered tables, in dependency order
    pub fn create_statements(&self) -> Vec<String> {
        self.tables()
            .iter()
            .flat_map(DdlGenerator::table_statements)
            .collect()
    }
}
