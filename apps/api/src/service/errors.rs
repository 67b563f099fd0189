use thiserror::Error;

use crate::domain::repositories::RepositoryError;

/// Business-rule failures raised by the user service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User by id {id} was not found")]
    NotFound { id: i32 },

    #[error("Email {email} taken")]
    AlreadyExists { email: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
