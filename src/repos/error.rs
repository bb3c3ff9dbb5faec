/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - Postgres の SQLSTATE → RepoError の対応付け
 */
use thiserror::Error;

// unique_violation
const UNIQUE_VIOLATION: &str = "23505";
// foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("invalid reference")]
    InvalidReference,
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && let Some(mapped) = Self::from_sqlstate(dbe.code().as_deref())
        {
            return mapped;
        }
        RepoError::Db(e)
    }

    /// Constraint violations the handlers turn into 409 / 400.
    fn from_sqlstate(code: Option<&str>) -> Option<Self> {
        match code {
            Some(UNIQUE_VIOLATION) => Some(RepoError::Conflict),
            Some(FOREIGN_KEY_VIOLATION) => Some(RepoError::InvalidReference),
            _ => None,
        }
    }
}
