use tokio::sync::RwLock;

use clientele_core::domain::customer::{Customer, CustomerDraft, CustomerId};

use super::{CustomerRepository, RepositoryError};

/// In-memory store mirroring the SQL implementation's semantics, including
/// insertion order and the unique-email constraint. Used by service-level tests
/// so orchestration logic can be exercised without a database.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let mut customers = self.customers.write().await;
        if customers.iter().any(|existing| existing.email == draft.email) {
            return Err(RepositoryError::DuplicateEmail(draft.email));
        }

        let customer = Customer {
            id: CustomerId::generate(),
            name: draft.name,
            email: draft.email,
            annual_spend: draft.annual_spend,
            last_purchase_date: draft.last_purchase_date,
        };
        customers.push(customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut customers = self.customers.write().await;
        if customers
            .iter()
            .any(|existing| existing.id != customer.id && existing.email == customer.email)
        {
            return Err(RepositoryError::DuplicateEmail(customer.email.clone()));
        }

        if let Some(existing) = customers.iter_mut().find(|existing| existing.id == customer.id) {
            *existing = customer.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|customer| customer.id == *id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|customer| customer.email == email).cloned())
    }

    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let needle = fragment.to_lowercase();
        let customers = self.customers.read().await;
        Ok(customers
            .iter()
            .filter(|customer| customer.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: &CustomerId) -> Result<(), RepositoryError> {
        let mut customers = self.customers.write().await;
        customers.retain(|customer| customer.id != *id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clientele_core::domain::customer::CustomerDraft;

    use super::InMemoryCustomerRepository;
    use crate::repositories::{CustomerRepository, RepositoryError};

    fn draft(name: &str, email: &str) -> CustomerDraft {
        CustomerDraft {
            name: name.to_string(),
            email: email.to_string(),
            annual_spend: None,
            last_purchase_date: None,
        }
    }

    #[tokio::test]
    async fn behaves_like_the_sql_store_for_lookups() {
        let repo = InMemoryCustomerRepository::default();

        let ada = repo.insert(draft("Ada Lovelace", "ada@example.com")).await.expect("insert");
        repo.insert(draft("Alan Turing", "alan@example.com")).await.expect("insert");

        assert_eq!(repo.find_all().await.expect("all").len(), 2);
        assert_eq!(
            repo.find_by_email("ada@example.com").await.expect("email").map(|c| c.id),
            Some(ada.id)
        );
        assert_eq!(repo.find_by_name_containing("tur").await.expect("name").len(), 1);
    }

    #[tokio::test]
    async fn enforces_unique_email_on_insert_and_update() {
        let repo = InMemoryCustomerRepository::default();

        repo.insert(draft("Ada Lovelace", "ada@example.com")).await.expect("insert");
        let mut alan = repo.insert(draft("Alan Turing", "alan@example.com")).await.expect("insert");

        let clash = repo.insert(draft("Impostor", "ada@example.com")).await;
        assert!(matches!(clash, Err(RepositoryError::DuplicateEmail(_))));

        alan.email = "ada@example.com".to_string();
        let clash = repo.update(&alan).await;
        assert!(matches!(clash, Err(RepositoryError::DuplicateEmail(_))));
    }
}
