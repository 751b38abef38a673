//! Persistent backend adapter over `PostgreSQL`.
//!
//! Translates the storage operation set to SQL. Every method either returns
//! the requested result or a [`StorageError`]; fallback to the in-memory
//! store is the facade's job, never this adapter's.
//!
//! Inserts bind the ID and `created_at` assigned by the in-memory step, so
//! the two stores always agree on identifiers. Queries are runtime-checked
//! (`sqlx::query` + bind) rather than the compile-time macros so the crate
//! builds without a live database.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use veda_crm_core::{Customer, CustomerId, FollowUp, FollowUpId, Product, ProductId};

use super::StorageError;

/// Adapter for the external `PostgreSQL` backend.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, address, notes, purchased_products, \
                                rating, last_visit, created_at";
const FOLLOW_UP_COLUMNS: &str = "id, customer_id, notes, status, scheduled_date, completed_at, \
                                 feedback, created_at";

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- Customers ----

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn customer(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    /// All customers, ordered by ID (insertion order).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn customers(&self) -> Result<Vec<Customer>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(customer_from_row).collect()
    }

    /// Insert a customer with the ID and timestamps assigned in memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the insert fails (e.g. the ID
    /// already exists from a previous process lifetime).
    pub async fn create_customer(&self, customer: &Customer) -> Result<Customer, StorageError> {
        let purchased: Vec<i32> = customer
            .purchased_products
            .iter()
            .map(|p| p.as_i32())
            .collect();

        let row = sqlx::query(&format!(
            "INSERT INTO customers ({CUSTOMER_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.email.as_deref())
        .bind(customer.address.as_deref())
        .bind(customer.notes.as_deref())
        .bind(&purchased)
        .bind(customer.rating)
        .bind(customer.last_visit)
        .bind(customer.created_at)
        .fetch_one(&self.pool)
        .await?;

        customer_from_row(&row)
    }

    /// Overwrite a customer row with the merged entity from memory.
    ///
    /// Returns `None` if the backend has no row for this ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the update fails.
    pub async fn update_customer(
        &self,
        customer: &Customer,
    ) -> Result<Option<Customer>, StorageError> {
        let purchased: Vec<i32> = customer
            .purchased_products
            .iter()
            .map(|p| p.as_i32())
            .collect();

        let row = sqlx::query(&format!(
            "UPDATE customers
             SET name = $2, phone = $3, email = $4, address = $5, notes = $6,
                 purchased_products = $7, rating = $8, last_visit = $9
             WHERE id = $1
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.email.as_deref())
        .bind(customer.address.as_deref())
        .bind(customer.notes.as_deref())
        .bind(&purchased)
        .bind(customer.rating)
        .bind(customer.last_visit)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    /// Delete a customer and its follow-ups.
    ///
    /// Returns whether a customer row was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if either delete fails.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<bool, StorageError> {
        sqlx::query("DELETE FROM follow_ups WHERE customer_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ---- Follow-ups ----

    /// Get a follow-up by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn follow_up(&self, id: FollowUpId) -> Result<Option<FollowUp>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {FOLLOW_UP_COLUMNS} FROM follow_ups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(follow_up_from_row).transpose()
    }

    /// All follow-ups, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn follow_ups(&self) -> Result<Vec<FollowUp>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {FOLLOW_UP_COLUMNS} FROM follow_ups ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(follow_up_from_row).collect()
    }

    /// Follow-ups referencing the given customer, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn follow_ups_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<FollowUp>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {FOLLOW_UP_COLUMNS} FROM follow_ups WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(follow_up_from_row).collect()
    }

    /// Insert a follow-up with the ID and timestamps assigned in memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the insert fails.
    pub async fn create_follow_up(&self, follow_up: &FollowUp) -> Result<FollowUp, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO follow_ups ({FOLLOW_UP_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {FOLLOW_UP_COLUMNS}"
        ))
        .bind(follow_up.id)
        .bind(follow_up.customer_id)
        .bind(&follow_up.notes)
        .bind(&follow_up.status)
        .bind(follow_up.scheduled_date)
        .bind(follow_up.completed_at)
        .bind(follow_up.feedback.as_ref())
        .bind(follow_up.created_at)
        .fetch_one(&self.pool)
        .await?;

        follow_up_from_row(&row)
    }

    /// Overwrite a follow-up row with the merged entity from memory.
    ///
    /// Returns `None` if the backend has no row for this ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the update fails.
    pub async fn update_follow_up(
        &self,
        follow_up: &FollowUp,
    ) -> Result<Option<FollowUp>, StorageError> {
        let row = sqlx::query(&format!(
            "UPDATE follow_ups
             SET customer_id = $2, notes = $3, status = $4, scheduled_date = $5,
                 completed_at = $6, feedback = $7
             WHERE id = $1
             RETURNING {FOLLOW_UP_COLUMNS}"
        ))
        .bind(follow_up.id)
        .bind(follow_up.customer_id)
        .bind(&follow_up.notes)
        .bind(&follow_up.status)
        .bind(follow_up.scheduled_date)
        .bind(follow_up.completed_at)
        .bind(follow_up.feedback.as_ref())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(follow_up_from_row).transpose()
    }

    /// Delete a follow-up. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the delete fails.
    pub async fn delete_follow_up(&self, id: FollowUpId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM follow_ups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ---- Products ----

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query("SELECT id, name FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// All products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn products(&self) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query("SELECT id, name FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Find a product by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query("SELECT id, name FROM products WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// Insert a product with the ID assigned in memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the insert fails (e.g. the name
    /// violates the unique constraint).
    pub async fn create_product(&self, product: &Product) -> Result<Product, StorageError> {
        let row = sqlx::query("INSERT INTO products (id, name) VALUES ($1, $2) RETURNING id, name")
            .bind(product.id)
            .bind(&product.name)
            .fetch_one(&self.pool)
            .await?;

        product_from_row(&row)
    }

    /// Delete a product. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the delete fails.
    pub async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn customer_from_row(row: &PgRow) -> Result<Customer, StorageError> {
    let purchased: Vec<i32> = row.try_get("purchased_products")?;
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        address: row.try_get("address")?,
        notes: row.try_get("notes")?,
        purchased_products: purchased.into_iter().map(ProductId::new).collect(),
        rating: row.try_get("rating")?,
        last_visit: row.try_get::<Option<DateTime<Utc>>, _>("last_visit")?,
        created_at: row.try_get("created_at")?,
    })
}

fn follow_up_from_row(row: &PgRow) -> Result<FollowUp, StorageError> {
    Ok(FollowUp {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        notes: row.try_get("notes")?,
        status: row.try_get("status")?,
        scheduled_date: row.try_get("scheduled_date")?,
        completed_at: row.try_get::<Option<DateTime<Utc>>, _>("completed_at")?,
        feedback: row.try_get("feedback")?,
        created_at: row.try_get("created_at")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, StorageError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}
