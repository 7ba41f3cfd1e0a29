use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use clientele_core::domain::customer::{Customer, CustomerDraft, CustomerId};

use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

/// SQLite-backed customer store. Monetary amounts and timestamps are kept as
/// TEXT (decimal string / RFC 3339) so nothing is lost to float rounding.
pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let customer = Customer {
            id: CustomerId::generate(),
            name: draft.name,
            email: draft.email,
            annual_spend: draft.annual_spend,
            last_purchase_date: draft.last_purchase_date,
        };

        sqlx::query(
            "INSERT INTO customers (id, name, email, annual_spend, last_purchase_date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(customer.id.to_string())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.annual_spend.map(|spend| spend.to_string()))
        .bind(customer.last_purchase_date.map(|date| date.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|error| map_write_error(&customer.email, error))?;

        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE customers
             SET name = ?, email = ?, annual_spend = ?, last_purchase_date = ?
             WHERE id = ?",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.annual_spend.map(|spend| spend.to_string()))
        .bind(customer.last_purchase_date.map(|date| date.to_rfc3339()))
        .bind(customer.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|error| map_write_error(&customer.email, error))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, annual_spend, last_purchase_date
             FROM customers WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_customer).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, email, annual_spend, last_purchase_date
             FROM customers ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_customer).collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, annual_spend, last_purchase_date
             FROM customers WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_customer).transpose()
    }

    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        // instr avoids LIKE wildcard handling for user-supplied fragments.
        let rows = sqlx::query(
            "SELECT id, name, email, annual_spend, last_purchase_date
             FROM customers WHERE instr(lower(name), lower(?)) > 0 ORDER BY rowid",
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_customer).collect()
    }

    async fn delete_by_id(&self, id: &CustomerId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn map_write_error(email: &str, error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            RepositoryError::DuplicateEmail(email.to_string())
        }
        _ => RepositoryError::Database(error),
    }
}

fn decode_customer(row: &SqliteRow) -> Result<Customer, RepositoryError> {
    let raw_id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|error| RepositoryError::Decode(format!("invalid customer id `{raw_id}`: {error}")))?;

    let annual_spend = row
        .try_get::<Option<String>, _>("annual_spend")?
        .map(|raw| {
            raw.parse::<Decimal>().map_err(|error| {
                RepositoryError::Decode(format!("invalid annual_spend `{raw}`: {error}"))
            })
        })
        .transpose()?;

    let last_purchase_date = row
        .try_get::<Option<String>, _>("last_purchase_date")?
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|date| date.with_timezone(&Utc))
                .map_err(|error| {
                    RepositoryError::Decode(format!("invalid last_purchase_date `{raw}`: {error}"))
                })
        })
        .transpose()?;

    Ok(Customer {
        id: CustomerId(id),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        annual_spend,
        last_purchase_date,
    })
}
