pub mod schema;
pub mod store;

pub use ::migrations::{self, sqlx};
pub use uuid;

pub use self::store::{ArticleStore, MemoryStore, PostgresStore, SharedStore};

#[derive(thiserror::Error, Debug)]
pub enum DatabaseError {
    #[error("not found")]
    RowNotFound,
    #[error("Cast to {kind} failed for value \"{value}\" at path \"{path}\"")]
    Cast {
        kind: &'static str,
        value: String,
        path: &'static str,
    },
    #[error("sql error: {0}")]
    Other(#[source] sqlx::Error),
}

pub trait SqlxResultExt<T> {
    fn map_database_error(self) -> Result<T, DatabaseError>;
}

impl<T> SqlxResultExt<T> for Result<T, sqlx::Error> {
    fn map_database_error(self) -> Result<T, DatabaseError> {
        self.map_err(|error| match error {
            sqlx::Error::RowNotFound => DatabaseError::RowNotFound,
            other => DatabaseError::Other(other),
        })
    }
}
