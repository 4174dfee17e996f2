use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Customer {0} not found")]
    CustomerNotFound(Uuid),
    #[error("None of the requested products exist")]
    NoProductsFound,
    #[error("Product {0} not found")]
    ProductNotFound(Uuid),
    #[error(
        "Insufficient stock for product {product_id}: {requested} requested in total, {available} available"
    )]
    InsufficientStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Validation failures are raised before anything is written.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DomainError::Persistence(_))
    }
}
