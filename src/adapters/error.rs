use crate::application::error::ApplicationError;

impl From<sqlx::Error> for ApplicationError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ApplicationError::StorageUnavailable(error.to_string())
            }
            sqlx::Error::Configuration(_) => ApplicationError::StorageUnavailable(error.to_string()),
            _ => ApplicationError::DatabaseError(error.to_string()),
        }
    }
}
