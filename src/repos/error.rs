/**
 * Responsibility
 * - What a repo tells the layer above (not-found / conflict / technical)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("db error")]
    Db(#[source] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// unique_violation (23505) becomes `Conflict`; everything else stays technical.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_technical() {
        let err = RepoError::from_sqlx(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepoError::Db(sqlx::Error::PoolTimedOut)));
    }
}
