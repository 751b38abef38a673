//! Storage facade: always-present in-memory store, optionally mirrored to
//! `PostgreSQL`.
//!
//! # Fallback protocol
//!
//! Writes run against the in-memory store first - identifier assignment and
//! cascade deletes never depend on the external backend - and are then
//! mirrored to the backend if one is configured. Reads prefer the backend
//! when configured. In both directions a backend failure is logged and
//! masked by the in-memory result; callers never see backend errors.
//!
//! Whether a backend is configured is fixed at construction for the process
//! lifetime. There is no retry, backoff, or reconnection: with the backend
//! unreachable every operation degrades to in-memory behavior and still
//! succeeds.

pub mod memory;
pub mod postgres;

use thiserror::Error;

use veda_crm_core::{
    Customer, CustomerId, FollowUp, FollowUpId, NewCustomer, NewFollowUp, NewProduct, Product,
    ProductId,
};

pub use memory::{DEFAULT_PRODUCTS, MemoryStore};
pub use postgres::PgStore;

/// Error from the persistent backend adapter.
///
/// Only ever observed inside the facade, where it is logged and masked by
/// falling back to the in-memory store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The single storage-access object through which all entity operations flow.
///
/// Composes the authoritative [`MemoryStore`] with an optional [`PgStore`];
/// constructed once at process start and shared through the application
/// state.
#[derive(Debug)]
pub struct Storage {
    memory: MemoryStore,
    persistent: Option<PgStore>,
}

impl Storage {
    /// Create the facade and seed the default product catalog.
    ///
    /// The 10 default products get IDs 1-10 before any caller-initiated
    /// creation. The Postgres side of the seed is applied by migration, so
    /// both stores agree on those IDs.
    #[must_use]
    pub fn new(persistent: Option<PgStore>) -> Self {
        let memory = MemoryStore::new();
        for name in DEFAULT_PRODUCTS {
            memory.create_product(NewProduct {
                name: name.to_owned(),
            });
        }

        if persistent.is_some() {
            tracing::info!("storage initialized with persistent backend mirroring");
        } else {
            tracing::info!("storage initialized in-memory only");
        }

        Self { memory, persistent }
    }

    /// Whether a persistent backend was configured at construction.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.persistent.is_some()
    }

    // ---- Customers ----

    /// Get a customer by ID.
    pub async fn customer(&self, id: CustomerId) -> Option<Customer> {
        if let Some(pg) = &self.persistent {
            match pg.customer(id).await {
                Ok(found) => return found,
                Err(err) => log_read_failure("customer", &err),
            }
        }
        self.memory.customer(id)
    }

    /// All customers.
    pub async fn customers(&self) -> Vec<Customer> {
        if let Some(pg) = &self.persistent {
            match pg.customers().await {
                Ok(found) => return found,
                Err(err) => log_read_failure("customers", &err),
            }
        }
        self.memory.customers()
    }

    /// Create a customer. Cannot fail: the in-memory create always succeeds
    /// and a backend failure falls back to its result.
    pub async fn create_customer(&self, new: NewCustomer) -> Customer {
        let created = self.memory.create_customer(new);
        let Some(pg) = &self.persistent else {
            return created;
        };
        match pg.create_customer(&created).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("create customer", &err);
                created
            }
        }
    }

    /// Update a customer. Returns `None` for an unknown ID.
    pub async fn update_customer(&self, id: CustomerId, new: NewCustomer) -> Option<Customer> {
        // Memory is authoritative for existence and for merge semantics; if
        // it has no record there is nothing to mirror.
        let merged = self.memory.update_customer(id, new)?;
        let Some(pg) = &self.persistent else {
            return Some(merged);
        };
        match pg.update_customer(&merged).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("update customer", &err);
                Some(merged)
            }
        }
    }

    /// Delete a customer and cascade to its follow-ups. Returns whether the
    /// customer existed.
    pub async fn delete_customer(&self, id: CustomerId) -> bool {
        let deleted = self.memory.delete_customer(id);
        let Some(pg) = &self.persistent else {
            return deleted;
        };
        match pg.delete_customer(id).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("delete customer", &err);
                deleted
            }
        }
    }

    // ---- Follow-ups ----

    /// Get a follow-up by ID.
    pub async fn follow_up(&self, id: FollowUpId) -> Option<FollowUp> {
        if let Some(pg) = &self.persistent {
            match pg.follow_up(id).await {
                Ok(found) => return found,
                Err(err) => log_read_failure("follow-up", &err),
            }
        }
        self.memory.follow_up(id)
    }

    /// All follow-ups.
    pub async fn follow_ups(&self) -> Vec<FollowUp> {
        if let Some(pg) = &self.persistent {
            match pg.follow_ups().await {
                Ok(found) => return found,
                Err(err) => log_read_failure("follow-ups", &err),
            }
        }
        self.memory.follow_ups()
    }

    /// Follow-ups referencing the given customer.
    pub async fn follow_ups_by_customer(&self, customer_id: CustomerId) -> Vec<FollowUp> {
        if let Some(pg) = &self.persistent {
            match pg.follow_ups_by_customer(customer_id).await {
                Ok(found) => return found,
                Err(err) => log_read_failure("follow-ups by customer", &err),
            }
        }
        self.memory.follow_ups_by_customer(customer_id)
    }

    /// Create a follow-up. Cannot fail.
    pub async fn create_follow_up(&self, new: NewFollowUp) -> FollowUp {
        let created = self.memory.create_follow_up(new);
        let Some(pg) = &self.persistent else {
            return created;
        };
        match pg.create_follow_up(&created).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("create follow-up", &err);
                created
            }
        }
    }

    /// Update a follow-up. Returns `None` for an unknown ID.
    pub async fn update_follow_up(&self, id: FollowUpId, new: NewFollowUp) -> Option<FollowUp> {
        let merged = self.memory.update_follow_up(id, new)?;
        let Some(pg) = &self.persistent else {
            return Some(merged);
        };
        match pg.update_follow_up(&merged).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("update follow-up", &err);
                Some(merged)
            }
        }
    }

    /// Delete a follow-up. Returns whether it existed.
    pub async fn delete_follow_up(&self, id: FollowUpId) -> bool {
        let deleted = self.memory.delete_follow_up(id);
        let Some(pg) = &self.persistent else {
            return deleted;
        };
        match pg.delete_follow_up(id).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("delete follow-up", &err);
                deleted
            }
        }
    }

    // ---- Products ----

    /// Get a product by ID.
    pub async fn product(&self, id: ProductId) -> Option<Product> {
        if let Some(pg) = &self.persistent {
            match pg.product(id).await {
                Ok(found) => return found,
                Err(err) => log_read_failure("product", &err),
            }
        }
        self.memory.product(id)
    }

    /// All products.
    pub async fn products(&self) -> Vec<Product> {
        if let Some(pg) = &self.persistent {
            match pg.products().await {
                Ok(found) => return found,
                Err(err) => log_read_failure("products", &err),
            }
        }
        self.memory.products()
    }

    /// Find a product by name, case-insensitively.
    ///
    /// The route layer uses this as a pre-check before `create_product`;
    /// name uniqueness is not enforced atomically by the store.
    pub async fn product_by_name(&self, name: &str) -> Option<Product> {
        if let Some(pg) = &self.persistent {
            match pg.find_product_by_name(name).await {
                Ok(found) => return found,
                Err(err) => log_read_failure("product by name", &err),
            }
        }
        self.memory.find_product_by_name(name)
    }

    /// Create a product. Cannot fail.
    pub async fn create_product(&self, new: NewProduct) -> Product {
        let created = self.memory.create_product(new);
        let Some(pg) = &self.persistent else {
            return created;
        };
        match pg.create_product(&created).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("create product", &err);
                created
            }
        }
    }

    /// Delete a product. Returns whether it existed.
    pub async fn delete_product(&self, id: ProductId) -> bool {
        let deleted = self.memory.delete_product(id);
        let Some(pg) = &self.persistent else {
            return deleted;
        };
        match pg.delete_product(id).await {
            Ok(mirrored) => mirrored,
            Err(err) => {
                log_write_failure("delete product", &err);
                deleted
            }
        }
    }
}

fn log_write_failure(operation: &str, err: &StorageError) {
    tracing::error!(
        error = %err,
        operation,
        "persistent backend write failed; keeping in-memory result"
    );
}

fn log_read_failure(operation: &str, err: &StorageError) {
    tracing::warn!(
        error = %err,
        operation,
        "persistent backend read failed; falling back to in-memory store"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn memory_only() -> Storage {
        Storage::new(None)
    }

    #[tokio::test]
    async fn test_seeds_ten_products_with_sequential_ids() {
        let storage = memory_only();
        let products = storage.products().await;

        assert_eq!(products.len(), 10);
        for (i, product) in products.iter().enumerate() {
            assert_eq!(product.id, ProductId::new(i32::try_from(i).unwrap() + 1));
            assert_eq!(product.name, DEFAULT_PRODUCTS[i]);
        }
    }

    #[tokio::test]
    async fn test_product_ids_continue_after_seed() {
        let storage = memory_only();
        let created = storage
            .create_product(NewProduct {
                name: "Moringa".to_owned(),
            })
            .await;
        assert_eq!(created.id, ProductId::new(11));

        assert!(storage.delete_product(created.id).await);
        let next = storage
            .create_product(NewProduct {
                name: "Arjuna".to_owned(),
            })
            .await;
        assert_eq!(next.id, ProductId::new(12));
    }

    #[tokio::test]
    async fn test_create_then_cascade_delete_scenario() {
        let storage = memory_only();

        let customer = storage
            .create_customer(NewCustomer {
                name: "Asha".to_owned(),
                phone: "555-1111".to_owned(),
                ..NewCustomer::default()
            })
            .await;
        assert_eq!(customer.id, CustomerId::new(1));
        assert_eq!(customer.name, "Asha");
        assert_eq!(customer.phone, "555-1111");
        assert!(customer.purchased_products.is_empty());

        let follow_up = storage
            .create_follow_up(NewFollowUp {
                customer_id: customer.id,
                notes: "call back".to_owned(),
                status: Some("pending".to_owned()),
                scheduled_date: Utc::now(),
                completed_at: None,
                feedback: None,
            })
            .await;
        assert_eq!(follow_up.id, FollowUpId::new(1));
        assert_eq!(follow_up.customer_id, customer.id);

        assert!(storage.delete_customer(customer.id).await);
        assert!(
            storage
                .follow_ups_by_customer(customer.id)
                .await
                .is_empty()
        );
        assert!(storage.follow_ups().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_customer_returns_false() {
        let storage = memory_only();
        assert!(!storage.delete_customer(CustomerId::new(42)).await);
    }

    #[tokio::test]
    async fn test_is_connected_reflects_configuration() {
        assert!(!memory_only().is_connected());
    }
}
