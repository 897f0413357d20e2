use thiserror::Error;

pub mod dao;
pub mod get_dashboard_stats;
pub mod get_partner;
pub mod get_partner_list;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Execution error: {0}")]
    ExecutionError(String),
    #[error("Database error: {0}")]
    DbError(String),
}
