//! Customer orchestration: the only layer that combines the store with the
//! tier classifier. Every outward-facing record is converted through
//! [`CustomerProfile::from_record`] with the invocation time as `now`, so the
//! tier is always freshly computed and never persisted.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use clientele_core::domain::customer::{CustomerDraft, CustomerId, CustomerProfile};
use clientele_db::repositories::{CustomerRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("search term must not be empty")]
    EmptyQuery,
    #[error("email `{0}` is already registered")]
    DuplicateEmail(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            other => Self::Repository(other),
        }
    }
}

#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// Create a customer. A missing `last_purchase_date` defaults to the
    /// creation timestamp before the record is persisted, so the stored value
    /// is never left absent by omission.
    pub async fn create(&self, mut draft: CustomerDraft) -> Result<CustomerProfile, ServiceError> {
        let now = Utc::now();
        draft.last_purchase_date.get_or_insert(now);

        let customer = self.repository.insert(draft).await?;
        Ok(CustomerProfile::from_record(&customer, now))
    }

    /// All customers in store order, each with a tier computed against a
    /// single `now` for the whole listing.
    pub async fn list(&self) -> Result<Vec<CustomerProfile>, ServiceError> {
        let now = Utc::now();
        let customers = self.repository.find_all().await?;
        Ok(customers.iter().map(|customer| CustomerProfile::from_record(customer, now)).collect())
    }

    pub async fn get(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, ServiceError> {
        let customer = self.repository.find_by_id(id).await?;
        Ok(customer.map(|customer| CustomerProfile::from_record(&customer, Utc::now())))
    }

    /// Case-insensitive substring search. An empty term is a caller error, not
    /// an empty-result query.
    pub async fn find_by_name(&self, term: &str) -> Result<Vec<CustomerProfile>, ServiceError> {
        if term.trim().is_empty() {
            return Err(ServiceError::EmptyQuery);
        }

        let now = Utc::now();
        let customers = self.repository.find_by_name_containing(term).await?;
        Ok(customers.iter().map(|customer| CustomerProfile::from_record(customer, now)).collect())
    }

    /// Exact email lookup; a present-but-unmatched email is a valid empty
    /// result.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerProfile>, ServiceError> {
        if email.trim().is_empty() {
            return Err(ServiceError::EmptyQuery);
        }

        let customer = self.repository.find_by_email(email).await?;
        Ok(customer.map(|customer| CustomerProfile::from_record(&customer, Utc::now())))
    }

    /// Full-replace update: every mutable field is overwritten from the draft,
    /// absent optionals included. `Ok(None)` when the id is unknown.
    pub async fn update(
        &self,
        id: &CustomerId,
        draft: CustomerDraft,
    ) -> Result<Option<CustomerProfile>, ServiceError> {
        let Some(mut customer) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        customer.replace_with(draft);
        self.repository.update(&customer).await?;
        Ok(Some(CustomerProfile::from_record(&customer, Utc::now())))
    }

    /// Idempotent: deleting an unknown id succeeds silently.
    pub async fn delete(&self, id: &CustomerId) -> Result<(), ServiceError> {
        self.repository.delete_by_id(id).await?;
        Ok(())
    }
}
