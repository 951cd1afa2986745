use super::BillError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bill error: {0}")]
    BillError(#[from] BillError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
