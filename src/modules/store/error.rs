use std::fmt;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::shared::retry::Retryable;

/// Which class of integrity constraint the storage engine rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Check => "check",
            ConstraintKind::NotNull => "not null",
        };
        f.write_str(label)
    }
}

/// Errors surfaced by [`CommerceStore`](super::CommerceStore) adapters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Write rejected by a uniqueness, referential or check constraint
    #[error("{kind} constraint `{constraint}` violated: {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        constraint: String,
        message: String,
    },

    /// Storage engine could not be reached or refused the connection
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    /// Statement cancelled by the engine's own statement timeout
    #[error("statement timed out in storage: {message}")]
    Timeout { message: String },

    /// Value does not fit the column type (numeric overflow, string too long)
    #[error("invalid value for storage: {message}")]
    InvalidValue { message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Any other engine failure
    #[error("storage query failed: {message}")]
    Query { message: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn constraint(
        kind: ConstraintKind,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StoreError::ConstraintViolation {
            kind,
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                let kind = match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        Some(ConstraintKind::ForeignKey)
                    }
                    sqlx::error::ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                    sqlx::error::ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                    _ => None,
                };
                if let Some(kind) = kind {
                    return StoreError::ConstraintViolation {
                        kind,
                        constraint,
                        message,
                    };
                }

                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                classify_sqlstate(&code, message)
            }
            sqlx::Error::Io(e) => StoreError::Unavailable {
                message: e.to_string(),
            },
            sqlx::Error::Tls(e) => StoreError::Unavailable {
                message: e.to_string(),
            },
            sqlx::Error::PoolTimedOut => StoreError::Unavailable {
                message: "timed out waiting for a pooled connection".to_string(),
            },
            sqlx::Error::PoolClosed => StoreError::Unavailable {
                message: "connection pool is closed".to_string(),
            },
            sqlx::Error::WorkerCrashed => StoreError::Unavailable {
                message: "connection worker crashed".to_string(),
            },
            other => StoreError::Query {
                message: other.to_string(),
            },
        }
    }
}

/// Map SQLSTATE codes that are not integrity violations
fn classify_sqlstate(code: &str, message: String) -> StoreError {
    match code {
        // query_canceled, raised by statement_timeout
        "57014" => StoreError::Timeout { message },
        // serialization_failure / deadlock_detected are safe to re-run
        "40001" | "40P01" => StoreError::Unavailable { message },
        // connection exceptions, insufficient resources, operator intervention
        c if c.starts_with("08") || c.starts_with("53") || c.starts_with("57P") => {
            StoreError::Unavailable { message }
        }
        // data exceptions: overflow, truncation, invalid text representation
        c if c.starts_with("22") => StoreError::InvalidValue { message },
        _ => StoreError::Query { message },
    }
}
