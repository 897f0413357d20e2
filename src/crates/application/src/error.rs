use domain::partner::PartnerError;
use domain::user::UserError;
use model::ModelError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}: {1}")]
    RepositoryError(String, String),
    #[error("Partner error: {0}")]
    PartnerError(#[from] PartnerError),
    #[error("User error: {0}")]
    UserError(#[from] UserError),
    #[error("Aggregate not found: {0}: {1}")]
    AggregateNotFound(String, String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Confirmation mismatch")]
    ConfirmationMismatch,

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Model error: {0}")]
    ModelError(#[from] ModelError),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}
