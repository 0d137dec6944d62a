//! Vendor error-code classification.
//!
//! Each storage engine reports constraint violations with its own codes. A
//! store exposes the table for its engine through
//! [`CatalogStore::error_codes`](crate::CatalogStore::error_codes), and the
//! services classify raw errors against it.

use crate::error::{CatalogError, ProductError};
use sqlx::error::DatabaseError;
use sqlx::postgres::PgDatabaseError;

/// Semantic category of a vendor error code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Unique or primary key constraint violated.
    DuplicateKey,
}

/// Mapping from vendor error codes to [`ErrorClass`].
#[derive(Debug)]
pub struct ErrorCodeTable {
    backend: &'static str,
    codes: &'static [(&'static str, ErrorClass)],
}

/// SQLite extended result codes (`SQLITE_CONSTRAINT_UNIQUE`,
/// `SQLITE_CONSTRAINT_PRIMARYKEY`).
pub static SQLITE_ERROR_CODES: ErrorCodeTable = ErrorCodeTable::new(
    "sqlite",
    &[
        ("2067", ErrorClass::DuplicateKey),
        ("1555", ErrorClass::DuplicateKey),
    ],
);

/// PostgreSQL SQLSTATE codes (`unique_violation`).
pub static POSTGRES_ERROR_CODES: ErrorCodeTable =
    ErrorCodeTable::new("postgres", &[("23505", ErrorClass::DuplicateKey)]);

impl ErrorCodeTable {
    pub const fn new(
        backend: &'static str,
        codes: &'static [(&'static str, ErrorClass)],
    ) -> Self {
        Self { backend, codes }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Look up the class of a vendor code.
    pub fn lookup(&self, code: &str) -> Option<ErrorClass> {
        self.codes
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, class)| *class)
    }

    /// Classify a raw repository error.
    ///
    /// Returns the unclassified error back when no rule matches so the caller
    /// can log it with full detail.
    pub fn classify(&self, err: CatalogError) -> Result<ProductError, CatalogError> {
        match err {
            CatalogError::NotFound(what) => Ok(ProductError::NotFound(what)),
            CatalogError::Database(sqlx::Error::Database(db_err)) => {
                let class = db_err.code().and_then(|code| self.lookup(&code));
                match class {
                    Some(ErrorClass::DuplicateKey) => {
                        Ok(ProductError::DuplicateKey(constraint_detail(&*db_err)))
                    }
                    None => Err(CatalogError::Database(sqlx::Error::Database(db_err))),
                }
            }
            other => Err(other),
        }
    }
}

/// Human-readable detail of a constraint violation.
///
/// PostgreSQL carries the offending key in its `detail` field; other engines
/// only have the message.
fn constraint_detail(db_err: &dyn DatabaseError) -> String {
    if let Some(pg_err) = db_err.try_downcast_ref::<PgDatabaseError>()
        && let Some(detail) = pg_err.detail()
    {
        return detail.to_string();
    }
    db_err.message().to_string()
}
