use sqlx::error::{DatabaseError, ErrorKind};
use std::fmt;
use thiserror::Error;

/// Which store-level constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Unique index or primary key collision.
    Unique,
    ForeignKey,
    NotNull,
    /// Named `CHECK` constraint, e.g. a column length limit.
    Check,
    /// Update of a column that is fixed once the row exists.
    Immutable,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
            ConstraintKind::Immutable => "immutable",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("{kind} constraint violated: {detail}")]
    Constraint { kind: ConstraintKind, detail: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            AppError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::Unique)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::ForeignKey)
    }

    pub fn is_check_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::Check)
    }

    pub fn is_immutable_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::Immutable)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(kind) = classify_database_error(&**db_err) {
                return AppError::Constraint {
                    kind,
                    detail: db_err.message().to_string(),
                };
            }
        }
        AppError::Database(err)
    }
}

fn classify_database_error(err: &dyn DatabaseError) -> Option<ConstraintKind> {
    match err.kind() {
        ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
        ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
        ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
        ErrorKind::CheckViolation => Some(ConstraintKind::Check),
        _ => classify_message(err.message()),
    }
}

/// Message prefix raised by the column immutability triggers
pub const IMMUTABLE_COLUMN_MESSAGE: &str = "immutable column";

/// Fallback for drivers that report constraint failures without an extended code,
/// and for trigger aborts, which carry no constraint kind of their own.
pub fn classify_message(message: &str) -> Option<ConstraintKind> {
    const PREFIXES: [(&str, ConstraintKind); 5] = [
        ("UNIQUE constraint failed", ConstraintKind::Unique),
        ("FOREIGN KEY constraint failed", ConstraintKind::ForeignKey),
        ("NOT NULL constraint failed", ConstraintKind::NotNull),
        ("CHECK constraint failed", ConstraintKind::Check),
        (IMMUTABLE_COLUMN_MESSAGE, ConstraintKind::Immutable),
    ];

    PREFIXES
        .iter()
        .find(|(prefix, _)| message.starts_with(prefix))
        .map(|(_, kind)| *kind)
}

pub type AppResult<T> = Result<T, AppError>;
