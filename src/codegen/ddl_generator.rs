// DDL Generator - renders table definitions as SQLite statements
// Every declared constraint becomes a named store-level constraint.

use crate::ent_framework::{
    FieldDefault, FieldDefinition, FieldType, IndexDefinition, ReferentialAction, TableDefinition,
};
use crate::error::IMMUTABLE_COLUMN_MESSAGE;

pub struct DdlGenerator;

impl DdlGenerator {
    /// `CREATE TABLE` statement with primary key, unique, length and foreign-key constraints
    pub fn create_table(table: &TableDefinition) -> String {
        let name = table.table_name();
        let rowid_key = table.has_rowid_key();

        let mut lines: Vec<String> = table
            .fields
            .iter()
            .map(|field| {
                let is_rowid = rowid_key && table.primary_key[0] == field.name;
                Self::column_line(field, is_rowid)
            })
            .collect();

        let pk_columns: Vec<String> = table.primary_key.iter().map(|c| quote_ident(c)).collect();
        lines.push(format!(
            "CONSTRAINT {} PRIMARY KEY ({})",
            quote_ident(&format!("pk_{}", name)),
            pk_columns.join(", ")
        ));

        for field in table.fields.iter().filter(|f| f.unique) {
            lines.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                quote_ident(&format!("uq_{}_{}", name, field.name)),
                quote_ident(&field.name)
            ));
        }

        for field in &table.fields {
            if let Some(max) = field.max_length {
                lines.push(format!(
                    "CONSTRAINT {} CHECK (length({}) <= {})",
                    quote_ident(&format!("ck_{}_{}_length", name, field.name)),
                    quote_ident(&field.name),
                    max
                ));
            }
        }

        for field in &table.fields {
            let Some(fk) = &field.references else { continue };
            let mut line = format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                quote_ident(&format!("fk_{}_{}", name, field.name)),
                quote_ident(&field.name),
                quote_ident(fk.target.table_name()),
                quote_ident(&fk.column)
            );
            match fk.on_delete {
                ReferentialAction::NoAction => {}
                ReferentialAction::Restrict => line.push_str(" ON DELETE RESTRICT"),
                ReferentialAction::Cascade => line.push_str(" ON DELETE CASCADE"),
            }
            lines.push(line);
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            quote_ident(name),
            lines.join(",\n    ")
        )
    }

    pub fn create_index(table: &TableDefinition, index: &IndexDefinition) -> String {
        let columns: Vec<String> = index.fields.iter().map(|c| quote_ident(c)).collect();
        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            quote_ident(&index.name),
            quote_ident(table.table_name()),
            columns.join(", ")
        )
    }

    /// Trigger aborting any update that changes an immutable column
    pub fn create_immutable_trigger(table: &TableDefinition, field: &FieldDefinition) -> String {
        let name = table.table_name();
        let column = quote_ident(&field.name);
        format!(
            "CREATE TRIGGER IF NOT EXISTS {} BEFORE UPDATE OF {} ON {} FOR EACH ROW \
             WHEN OLD.{} IS NOT NEW.{} \
             BEGIN SELECT RAISE(ABORT, {}); END",
            quote_ident(&format!("trg_{}_{}_immutable", name, field.name)),
            column,
            quote_ident(name),
            column,
            column,
            string_literal(&format!("{} {}.{}", IMMUTABLE_COLUMN_MESSAGE, name, field.name))
        )
    }

    /// Table followed by its indexes and immutability triggers
    pub fn table_statements(table: &TableDefinition) -> Vec<String> {
        let mut statements = vec![Self::create_table(table)];
        statements.extend(table.indexes.iter().map(|i| Self::create_index(table, i)));
        statements.extend(
            table
                .fields
                .iter()
                .filter(|f| f.immutable)
                .map(|f| Self::create_immutable_trigger(table, f)),
        );
        statements
    }

    fn column_line(field: &FieldDefinition, is_rowid: bool) -> String {
        let mut line = format!("{} {}", quote_ident(&field.name), sql_type(field));
        // A NULL row id makes SQLite assign the next one.
        if !field.optional && !is_rowid {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = &field.default {
            line.push_str(" DEFAULT ");
            line.push_str(&default_literal(default));
        }
        line
    }
}

fn sql_type(field: &FieldDefinition) -> String {
    match (field.field_type, field.max_length) {
        (FieldType::Integer, _) => "INTEGER".to_string(),
        (FieldType::Bool, _) => "BOOLEAN".to_string(),
        (FieldType::String, Some(max)) => format!("VARCHAR({})", max),
        (FieldType::String, None) => "TEXT".to_string(),
    }
}

fn default_literal(default: &FieldDefault) -> String {
    match default {
        FieldDefault::Bool(true) => "1".to_string(),
        FieldDefault::Bool(false) => "0".to_string(),
        FieldDefault::Int(value) => value.to_string(),
        FieldDefault::String(value) => string_literal(value),
    }
}

fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ent_framework::{EntSchema, TableDefinition};
    use crate::models::EntityType;
    use crate::schemas::{FollowerSchema, PostSchema, UserSchema};

    #[test]
    fn test_user_table_constraints() {
        let sql = DdlGenerator::create_table(&TableDefinition::of::<UserSchema>());

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"user\" ("));
        assert!(sql.contains("\"id\" INTEGER,"));
        assert!(sql.contains("\"username\" VARCHAR(50) NOT NULL"));
        assert!(sql.contains("\"email\" VARCHAR(120) NOT NULL"));
        assert!(sql.contains("\"password\" TEXT NOT NULL"));
        assert!(sql.contains("\"is_active\" BOOLEAN NOT NULL DEFAULT 1"));
        assert!(sql.contains("CONSTRAINT \"pk_user\" PRIMARY KEY (\"id\")"));
        assert!(sql.contains("CONSTRAINT \"uq_user_username\" UNIQUE (\"username\")"));
        assert!(sql.contains("CONSTRAINT \"uq_user_email\" UNIQUE (\"email\")"));
        assert!(sql.contains(
            "CONSTRAINT \"ck_user_firstname_length\" CHECK (length(\"firstname\") <= 50)"
        ));
        assert!(!sql.contains("uq_user_firstname"));
    }

    #[test]
    fn test_post_foreign_key_has_no_cascade() {
        let sql = DdlGenerator::create_table(&TableDefinition::of::<PostSchema>());
        assert!(sql.contains(
            "CONSTRAINT \"fk_post_author_id\" FOREIGN KEY (\"author_id\") REFERENCES \"user\" (\"id\")"
        ));
        assert!(!sql.contains("ON DELETE"));
        assert!(sql.contains("CHECK (length(\"content\") <= 280)"));
    }

    #[test]
    fn test_follower_composite_primary_key() {
        let table = TableDefinition::of::<FollowerSchema>();
        assert!(!table.has_rowid_key());

        let sql = DdlGenerator::create_table(&table);
        assert!(sql.contains("\"user_from_id\" INTEGER NOT NULL"));
        assert!(sql.contains("\"user_to_id\" INTEGER NOT NULL"));
        assert!(sql.contains(
            "CONSTRAINT \"pk_follower\" PRIMARY KEY (\"user_from_id\", \"user_to_id\")"
        ));
        assert!(!sql.contains("\"id\" INTEGER"));
    }

    #[test]
    fn test_immutable_columns_get_update_triggers() {
        let statements = DdlGenerator::table_statements(&TableDefinition::of::<PostSchema>());
        let triggers: Vec<&String> = statements
            .iter()
            .filter(|s| s.starts_with("CREATE TRIGGER"))
            .collect();

        // id, created_at and author_id; content stays editable
        assert_eq!(triggers.len(), 3);
        assert!(triggers.iter().any(|t| t.contains(
            "\"trg_post_author_id_immutable\" BEFORE UPDATE OF \"author_id\" ON \"post\""
        )));
        assert!(triggers
            .iter()
            .any(|t| t.contains("RAISE(ABORT, 'immutable column post.created_at')")));
        assert!(!triggers.iter().any(|t| t.contains("\"content\"")));
    }

    struct Tagged;

    impl EntSchema for Tagged {
        fn entity_type() -> EntityType {
            EntityType::Media
        }

        fn fields() -> Vec<FieldDefinition> {
            vec![
                FieldDefinition::new("id", FieldType::Integer),
                FieldDefinition::new("label", FieldType::String)
                    .optional()
                    .default_value(FieldDefault::String("it's".to_string())),
                FieldDefinition::new("post_id", FieldType::Integer)
                    .references(EntityType::Post, "id")
                    .on_delete(ReferentialAction::Cascade),
            ]
        }

        fn indexes() -> Vec<IndexDefinition> {
            vec![IndexDefinition::new("idx_media_label", vec!["label"]).unique()]
        }
    }

    #[test]
    fn test_optional_defaults_and_delete_rules() {
        let table = TableDefinition::of::<Tagged>();
        let statements = DdlGenerator::table_statements(&table);
        assert_eq!(statements.len(), 2);

        assert!(statements[0].contains("\"label\" TEXT DEFAULT 'it''s'"));
        assert!(statements[0].contains("ON DELETE CASCADE"));
        assert_eq!(
            statements[1],
            "CREATE UNIQUE INDEX IF NOT EXISTS \"idx_media_label\" ON \"media\" (\"label\")"
        );
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
