// Ent Schema Framework - declarative table definitions
// Schemas describe columns, keys, relationships and indexes; the store enforces them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::EntityType;

/// Schema definition trait, one implementation per persisted entity
pub trait EntSchema: Send + Sync {
    /// Entity type this schema defines
    fn entity_type() -> EntityType
    where
        Self: Sized;

    /// Define columns for this entity
    fn fields() -> Vec<FieldDefinition>
    where
        Self: Sized;

    /// Primary key columns. A single `INTEGER` column becomes the row id.
    fn primary_key() -> Vec<&'static str>
    where
        Self: Sized,
    {
        vec!["id"]
    }

    /// Define edges (relationships) for this entity
    fn edges() -> Vec<EdgeDefinition>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Define secondary indexes for this entity
    fn indexes() -> Vec<IndexDefinition>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub optional: bool,
    pub default: Option<FieldDefault>,
    pub unique: bool,
    /// Never written after the row is created.
    pub immutable: bool,
    /// Upper bound on character length, enforced with a `CHECK` constraint.
    pub max_length: Option<usize>,
    pub references: Option<ForeignKeyRef>,
}

impl FieldDefinition {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            optional: false,
            default: None,
            unique: false,
            immutable: false,
            max_length: None,
            references: None,
        }
    }

    /// Mark field as nullable
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark field as unique across the table
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark field as immutable (can't be updated after creation)
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Declare a foreign key to `column` on `target`
    pub fn references(mut self, target: EntityType, column: &str) -> Self {
        self.references = Some(ForeignKeyRef {
            target,
            column: column.to_string(),
            on_delete: ReferentialAction::NoAction,
        });
        self
    }

    /// Override the delete rule of the foreign key declared with `references`
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_delete = action;
        }
        self
    }
}

/// Column types supported by the schema layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    String,
    Bool,
}

/// Column default values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldDefault {
    Bool(bool),
    Int(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub target: EntityType,
    pub column: String,
    pub on_delete: ReferentialAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
}

/// Relationship between two entities, always carried by a foreign-key column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub name: String,
    pub target_entity: EntityType,
    pub edge_type: EdgeType,
    /// Foreign-key column the edge travels through. For `From` edges it lives
    /// on this entity, for `To` edges on the target.
    pub via_field: String,
    pub inverse_name: Option<String>,
}

impl EdgeDefinition {
    /// Collection edge: rows of `target` whose `via_field` points at this entity
    pub fn to(name: &str, target: EntityType, via_field: &str) -> Self {
        Self {
            name: name.to_string(),
            target_entity: target,
            edge_type: EdgeType::To,
            via_field: via_field.to_string(),
            inverse_name: None,
        }
    }

    /// Reference edge: the single `target` row this entity's `via_field` names
    pub fn from(name: &str, target: EntityType, via_field: &str) -> Self {
        Self {
            name: name.to_string(),
            target_entity: target,
            edge_type: EdgeType::From,
            via_field: via_field.to_string(),
            inverse_name: None,
        }
    }

    /// Name of the matching edge on the target entity
    pub fn inverse(mut self, name: &str) -> Self {
        self.inverse_name = Some(name.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    To,   // One-to-many, target rows hold the foreign key
    From, // Many-to-one, this entity holds the foreign key
}

/// Secondary index definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(name: &str, fields: Vec<&str>) -> Self {
        Self {
            name: name.to_string(),
            fields: fields.into_iter().map(|s| s.to_string()).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Everything declared for one table, collected from its `EntSchema`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub entity_type: EntityType,
    pub fields: Vec<FieldDefinition>,
    pub primary_key: Vec<String>,
    pub edges: Vec<EdgeDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn of<T: EntSchema>() -> Self {
        Self {
            entity_type: T::entity_type(),
            fields: T::fields(),
            primary_key: T::primary_key().into_iter().map(String::from).collect(),
            edges: T::edges(),
            indexes: T::indexes(),
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.entity_type.table_name()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn edge(&self, name: &str) -> Option<&EdgeDefinition> {
        self.edges.iter().find(|e| e.name == name)
    }

    /// True when the primary key is a single integer column (SQLite row id alias)
    pub fn has_rowid_key(&self) -> bool {
        match self.primary_key.as_slice() {
            [only] => self
                .field(only)
                .map(|f| f.field_type == FieldType::Integer)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Whether `column` alone is guaranteed unique, so it can be a foreign-key target
    fn is_key_column(&self, column: &str) -> bool {
        let single_pk = self.primary_key.len() == 1 && self.primary_key[0] == column;
        single_pk || self.field(column).map(|f| f.unique).unwrap_or(false)
    }
}

/// Schema registry - holds every table definition in creation order
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    tables: Vec<TableDefinition>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema. Tables must be registered after the tables they reference;
    /// registering a type again replaces its definition in place.
    pub fn register<T: EntSchema + 'static>(&mut self) {
        let table = TableDefinition::of::<T>();
        match self.tables.iter_mut().find(|t| t.entity_type == table.entity_type) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, entity_type: EntityType) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.entity_type == entity_type)
    }

    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    /// Validate schema consistency
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (position, table) in self.tables.iter().enumerate() {
            let name = table.table_name();

            let mut seen = HashSet::new();
            for field in &table.fields {
                if !seen.insert(field.name.as_str()) {
                    errors.push(format!("Table '{}' declares field '{}' twice", name, field.name));
                }
            }

            if table.primary_key.is_empty() {
                errors.push(format!("Table '{}' has no primary key", name));
            }
            for column in &table.primary_key {
                if table.field(column).is_none() {
                    errors.push(format!(
                        "Primary key of '{}' names unknown field '{}'",
                        name, column
                    ));
                }
            }

            for field in &table.fields {
                let Some(fk) = &field.references else { continue };
                match self.tables.iter().position(|t| t.entity_type == fk.target) {
                    None => errors.push(format!(
                        "Field '{}.{}' references unregistered table '{}'",
                        name, field.name, fk.target
                    )),
                    Some(target_position) => {
                        let target = &self.tables[target_position];
                        if target_position > position {
                            errors.push(format!(
                                "Field '{}.{}' references '{}' which is registered later",
                                name, field.name, fk.target
                            ));
                        }
                        if !target.is_key_column(&fk.column) {
                            errors.push(format!(
                                "Field '{}.{}' references '{}.{}' which is not a unique key",
                                name, field.name, fk.target, fk.column
                            ));
                        }
                    }
                }
            }

            for edge in &table.edges {
                errors.extend(self.validate_edge(table, edge));
            }

            for index in &table.indexes {
                for column in &index.fields {
                    if table.field(column).is_none() {
                        errors.push(format!(
                            "Index '{}' on '{}' names unknown field '{}'",
                            index.name, name, column
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_edge(&self, table: &TableDefinition, edge: &EdgeDefinition) -> Vec<String> {
        let mut errors = Vec::new();
        let name = table.table_name();

        let Some(target) = self.get(edge.target_entity) else {
            errors.push(format!(
                "Entity '{}' has edge '{}' pointing to undefined entity '{}'",
                name, edge.name, edge.target_entity
            ));
            return errors;
        };

        // The foreign key must exist on the holder and point at the other side.
        let (holder, pointed_at) = match edge.edge_type {
            EdgeType::From => (table, target.entity_type),
            EdgeType::To => (target, table.entity_type),
        };
        let carries_key = holder
            .field(&edge.via_field)
            .and_then(|f| f.references.as_ref())
            .map(|fk| fk.target == pointed_at)
            .unwrap_or(false);
        if !carries_key {
            errors.push(format!(
                "Edge '{}.{}' expects '{}.{}' to reference '{}'",
                name,
                edge.name,
                holder.table_name(),
                edge.via_field,
                pointed_at
            ));
        }

        if let Some(inverse) = &edge.inverse_name {
            match target.edge(inverse) {
                Some(back) if back.via_field == edge.via_field => {}
                Some(_) => errors.push(format!(
                    "Edge '{}.{}' and its inverse '{}.{}' use different fields",
                    name, edge.name, target.table_name(), inverse
                )),
                None => errors.push(format!(
                    "Edge '{}.{}' has no corresponding inverse '{}' on '{}'",
                    name, edge.name, inverse, target.table_name()
                )),
            }
        }

        errors
    }
}
