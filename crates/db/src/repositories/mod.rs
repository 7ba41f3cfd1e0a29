use async_trait::async_trait;
use thiserror::Error;

use clientele_core::domain::customer::{Customer, CustomerDraft, CustomerId};

pub mod customer;
pub mod memory;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryCustomerRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("email `{0}` is already registered")]
    DuplicateEmail(String),
}

/// Storage contract for customer records. Identifier assignment happens inside
/// `insert`; callers never pick ids. `delete_by_id` is idempotent.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError>;

    /// Full-row overwrite keyed by `customer.id`. Overwriting a missing row is
    /// a no-op; callers that care check existence first.
    async fn update(&self, customer: &Customer) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// All records in insertion order.
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Exact email match. Uniqueness is enforced at insert/update, so at most
    /// one record can come back.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;

    /// Case-insensitive substring match on the customer name.
    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Customer>, RepositoryError>;

    async fn delete_by_id(&self, id: &CustomerId) -> Result<(), RepositoryError>;
}
