//! Always-available in-memory store.
//!
//! This is the authoritative store: every write lands here first, and reads
//! fall back here whenever the persistent backend is unavailable. Identifier
//! assignment and cascade semantics therefore never depend on an external
//! system.
//!
//! Tables are `BTreeMap`s keyed by ID behind a single mutex. IDs are
//! monotonic and never reused, so iterating a table in key order is
//! insertion order. The lock is never held across an await point, which
//! makes each operation (including counter increment + insert, and the
//! customer cascade delete) atomic from any observer's point of view.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use veda_crm_core::{
    Customer, CustomerId, FollowUp, FollowUpId, NewCustomer, NewFollowUp, NewProduct, Product,
    ProductId,
};

/// Names of the 10 products seeded at facade construction, in seeding order.
pub const DEFAULT_PRODUCTS: [&str; 10] = [
    "Ashwagandha",
    "Triphala",
    "Brahmi",
    "Turmeric",
    "Shilajit",
    "Neem",
    "Amla",
    "Tulsi",
    "Guduchi",
    "Shatavari",
];

#[derive(Debug)]
struct Tables {
    customers: BTreeMap<i32, Customer>,
    follow_ups: BTreeMap<i32, FollowUp>,
    products: BTreeMap<i32, Product>,
    next_customer_id: i32,
    next_follow_up_id: i32,
    next_product_id: i32,
}

impl Tables {
    const fn new() -> Self {
        Self {
            customers: BTreeMap::new(),
            follow_ups: BTreeMap::new(),
            products: BTreeMap::new(),
            next_customer_id: 1,
            next_follow_up_id: 1,
            next_product_id: 1,
        }
    }
}

/// In-memory tables for all three entity types.
///
/// Operations never fail; absence is signaled with `Option`/`bool`.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store with all ID counters at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the tables themselves are still structurally valid.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- Customers ----

    /// Get a customer by ID.
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.lock().customers.get(&id.as_i32()).cloned()
    }

    /// All customers, in insertion order.
    #[must_use]
    pub fn customers(&self) -> Vec<Customer> {
        self.lock().customers.values().cloned().collect()
    }

    /// Create a customer, assigning the next ID and `created_at`.
    ///
    /// A missing `purchased_products` defaults to an empty list.
    pub fn create_customer(&self, new: NewCustomer) -> Customer {
        let mut tables = self.lock();
        let id = CustomerId::new(tables.next_customer_id);
        tables.next_customer_id += 1;

        let customer = Customer {
            id,
            name: new.name,
            phone: new.phone,
            email: new.email.flatten(),
            address: new.address.flatten(),
            notes: new.notes.flatten(),
            purchased_products: new.purchased_products.unwrap_or_default(),
            rating: new.rating.flatten(),
            last_visit: new.last_visit.flatten(),
            created_at: Utc::now(),
        };
        tables.customers.insert(id.as_i32(), customer.clone());
        customer
    }

    /// Merge `new` over an existing customer.
    ///
    /// `id` and `created_at` are re-forced from the stored record. Absent
    /// optional fields preserve the stored values; an explicit `null`
    /// clears them. A missing `purchased_products` keeps the stored list,
    /// while an explicit empty list clears it. Returns `None` if the ID is
    /// unknown.
    pub fn update_customer(&self, id: CustomerId, new: NewCustomer) -> Option<Customer> {
        let mut tables = self.lock();
        let existing = tables.customers.get(&id.as_i32())?.clone();

        let updated = Customer {
            id: existing.id,
            name: new.name,
            phone: new.phone,
            email: new.email.unwrap_or(existing.email),
            address: new.address.unwrap_or(existing.address),
            notes: new.notes.unwrap_or(existing.notes),
            purchased_products: new
                .purchased_products
                .unwrap_or(existing.purchased_products),
            rating: new.rating.unwrap_or(existing.rating),
            last_visit: new.last_visit.unwrap_or(existing.last_visit),
            created_at: existing.created_at,
        };
        tables.customers.insert(id.as_i32(), updated.clone());
        Some(updated)
    }

    /// Delete a customer and every follow-up that references it.
    ///
    /// Returns `false` (with no side effect) if the ID is unknown.
    pub fn delete_customer(&self, id: CustomerId) -> bool {
        let mut tables = self.lock();
        if tables.customers.remove(&id.as_i32()).is_none() {
            return false;
        }
        tables.follow_ups.retain(|_, f| f.customer_id != id);
        true
    }

    // ---- Follow-ups ----

    /// Get a follow-up by ID.
    #[must_use]
    pub fn follow_up(&self, id: FollowUpId) -> Option<FollowUp> {
        self.lock().follow_ups.get(&id.as_i32()).cloned()
    }

    /// All follow-ups, in insertion order.
    #[must_use]
    pub fn follow_ups(&self) -> Vec<FollowUp> {
        self.lock().follow_ups.values().cloned().collect()
    }

    /// Follow-ups referencing the given customer, in insertion order.
    #[must_use]
    pub fn follow_ups_by_customer(&self, customer_id: CustomerId) -> Vec<FollowUp> {
        self.lock()
            .follow_ups
            .values()
            .filter(|f| f.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// Create a follow-up, assigning the next ID and `created_at`.
    ///
    /// A missing `status` defaults to `"pending"`.
    pub fn create_follow_up(&self, new: NewFollowUp) -> FollowUp {
        let mut tables = self.lock();
        let id = FollowUpId::new(tables.next_follow_up_id);
        tables.next_follow_up_id += 1;

        let follow_up = FollowUp {
            id,
            customer_id: new.customer_id,
            notes: new.notes,
            status: new
                .status
                .unwrap_or_else(|| FollowUp::DEFAULT_STATUS.to_owned()),
            scheduled_date: new.scheduled_date,
            completed_at: new.completed_at.flatten(),
            feedback: new.feedback.flatten(),
            created_at: Utc::now(),
        };
        tables.follow_ups.insert(id.as_i32(), follow_up.clone());
        follow_up
    }

    /// Merge `new` over an existing follow-up.
    ///
    /// `id` and `created_at` are re-forced from the stored record; absent
    /// optional fields preserve the stored values, an explicit `null`
    /// clears them. Returns `None` if the ID is unknown.
    pub fn update_follow_up(&self, id: FollowUpId, new: NewFollowUp) -> Option<FollowUp> {
        let mut tables = self.lock();
        let existing = tables.follow_ups.get(&id.as_i32())?.clone();

        let updated = FollowUp {
            id: existing.id,
            customer_id: new.customer_id,
            notes: new.notes,
            status: new.status.unwrap_or(existing.status),
            scheduled_date: new.scheduled_date,
            completed_at: new.completed_at.unwrap_or(existing.completed_at),
            feedback: new.feedback.unwrap_or(existing.feedback),
            created_at: existing.created_at,
        };
        tables.follow_ups.insert(id.as_i32(), updated.clone());
        Some(updated)
    }

    /// Delete a follow-up. Returns `false` if the ID is unknown.
    pub fn delete_follow_up(&self, id: FollowUpId) -> bool {
        self.lock().follow_ups.remove(&id.as_i32()).is_some()
    }

    // ---- Products ----

    /// Get a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.lock().products.get(&id.as_i32()).cloned()
    }

    /// All products, in insertion order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.values().cloned().collect()
    }

    /// Find a product by name, case-insensitively.
    #[must_use]
    pub fn find_product_by_name(&self, name: &str) -> Option<Product> {
        let needle = name.to_lowercase();
        self.lock()
            .products
            .values()
            .find(|p| p.name.to_lowercase() == needle)
            .cloned()
    }

    /// Create a product, assigning the next ID.
    pub fn create_product(&self, new: NewProduct) -> Product {
        let mut tables = self.lock();
        let id = ProductId::new(tables.next_product_id);
        tables.next_product_id += 1;

        let product = Product { id, name: new.name };
        tables.products.insert(id.as_i32(), product.clone());
        product
    }

    /// Delete a product. Returns `false` if the ID is unknown.
    pub fn delete_product(&self, id: ProductId) -> bool {
        self.lock().products.remove(&id.as_i32()).is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_owned(),
            phone: "555-0000".to_owned(),
            ..NewCustomer::default()
        }
    }

    fn new_follow_up(customer_id: CustomerId) -> NewFollowUp {
        NewFollowUp {
            customer_id,
            notes: "call back".to_owned(),
            status: None,
            scheduled_date: Utc::now(),
            completed_at: None,
            feedback: None,
        }
    }

    #[test]
    fn test_customer_ids_are_monotonic_and_never_reused() {
        let store = MemoryStore::new();
        let a = store.create_customer(new_customer("a"));
        let b = store.create_customer(new_customer("b"));
        assert_eq!(a.id, CustomerId::new(1));
        assert_eq!(b.id, CustomerId::new(2));

        assert!(store.delete_customer(b.id));
        let c = store.create_customer(new_customer("c"));
        assert_eq!(c.id, CustomerId::new(3));
    }

    #[test]
    fn test_create_customer_defaults_purchased_products_to_empty() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer("a"));
        assert!(customer.purchased_products.is_empty());
        assert!(customer.email.is_none());
    }

    #[test]
    fn test_update_customer_preserves_id_and_created_at() {
        let store = MemoryStore::new();
        let created = store.create_customer(new_customer("a"));

        let updated = store
            .update_customer(created.id, new_customer("renamed"))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "renamed");
    }

    #[test]
    fn test_update_customer_purchased_products_merge() {
        let store = MemoryStore::new();
        let created = store.create_customer(NewCustomer {
            purchased_products: Some(vec![ProductId::new(1), ProductId::new(2)]),
            ..new_customer("a")
        });
        assert_eq!(created.purchased_products.len(), 2);

        // Omitted list preserves the stored one
        let updated = store
            .update_customer(created.id, new_customer("a"))
            .unwrap();
        assert_eq!(updated.purchased_products.len(), 2);

        // Explicit empty list clears it
        let cleared = store
            .update_customer(
                created.id,
                NewCustomer {
                    purchased_products: Some(Vec::new()),
                    ..new_customer("a")
                },
            )
            .unwrap();
        assert!(cleared.purchased_products.is_empty());
    }

    #[test]
    fn test_update_customer_preserves_absent_optional_fields() {
        let store = MemoryStore::new();
        let created = store.create_customer(NewCustomer {
            email: Some(Some("asha@example.com".to_owned())),
            ..new_customer("a")
        });

        let updated = store
            .update_customer(created.id, new_customer("a"))
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("asha@example.com"));
    }

    #[test]
    fn test_update_customer_explicit_null_clears_optional_fields() {
        let store = MemoryStore::new();
        let created = store.create_customer(NewCustomer {
            email: Some(Some("asha@example.com".to_owned())),
            rating: Some(Some(4)),
            ..new_customer("Asha")
        });

        let payload: NewCustomer = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "phone": "555-0000",
            "email": null,
            "rating": null
        }))
        .unwrap();
        let updated = store.update_customer(created.id, payload).unwrap();
        assert!(updated.email.is_none());
        assert!(updated.rating.is_none());
    }

    #[test]
    fn test_update_unknown_customer_returns_none() {
        let store = MemoryStore::new();
        assert!(
            store
                .update_customer(CustomerId::new(99), new_customer("x"))
                .is_none()
        );
    }

    #[test]
    fn test_delete_customer_cascades_to_follow_ups() {
        let store = MemoryStore::new();
        let keep = store.create_customer(new_customer("keep"));
        let gone = store.create_customer(new_customer("gone"));
        store.create_follow_up(new_follow_up(gone.id));
        store.create_follow_up(new_follow_up(gone.id));
        let kept_follow_up = store.create_follow_up(new_follow_up(keep.id));

        assert!(store.delete_customer(gone.id));
        assert!(store.follow_ups_by_customer(gone.id).is_empty());

        let remaining = store.follow_ups();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept_follow_up.id);
    }

    #[test]
    fn test_delete_unknown_customer_is_a_no_op() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer("a"));
        store.create_follow_up(new_follow_up(customer.id));

        assert!(!store.delete_customer(CustomerId::new(99)));
        assert_eq!(store.customers().len(), 1);
        assert_eq!(store.follow_ups().len(), 1);
    }

    #[test]
    fn test_follow_up_status_defaults_to_pending() {
        let store = MemoryStore::new();
        let follow_up = store.create_follow_up(new_follow_up(CustomerId::new(1)));
        assert_eq!(follow_up.status, "pending");

        let explicit = store.create_follow_up(NewFollowUp {
            status: Some("completed".to_owned()),
            ..new_follow_up(CustomerId::new(1))
        });
        assert_eq!(explicit.status, "completed");
    }

    #[test]
    fn test_update_follow_up_preserves_status_when_absent() {
        let store = MemoryStore::new();
        let created = store.create_follow_up(NewFollowUp {
            status: Some("completed".to_owned()),
            ..new_follow_up(CustomerId::new(1))
        });

        let updated = store
            .update_follow_up(created.id, new_follow_up(CustomerId::new(1)))
            .unwrap();
        assert_eq!(updated.status, "completed");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_follow_up_merges_completed_at_by_presence() {
        let store = MemoryStore::new();
        let created = store.create_follow_up(NewFollowUp {
            completed_at: Some(Some(Utc::now())),
            ..new_follow_up(CustomerId::new(1))
        });
        assert!(created.completed_at.is_some());

        // Absent field preserves the stored value
        let kept = store
            .update_follow_up(created.id, new_follow_up(CustomerId::new(1)))
            .unwrap();
        assert_eq!(kept.completed_at, created.completed_at);

        // Explicit null clears it
        let payload: NewFollowUp = serde_json::from_value(serde_json::json!({
            "customerId": 1,
            "notes": "call back",
            "scheduledDate": "2026-09-01T10:00:00Z",
            "completedAt": null
        }))
        .unwrap();
        let cleared = store.update_follow_up(created.id, payload).unwrap();
        assert!(cleared.completed_at.is_none());
    }

    #[test]
    fn test_find_product_by_name_is_case_insensitive() {
        let store = MemoryStore::new();
        let product = store.create_product(NewProduct {
            name: "Ashwagandha".to_owned(),
        });

        assert_eq!(
            store.find_product_by_name("ashwagandha").map(|p| p.id),
            Some(product.id)
        );
        assert_eq!(
            store.find_product_by_name("ASHWAGANDHA").map(|p| p.id),
            Some(product.id)
        );
        assert!(store.find_product_by_name("Triphala").is_none());
    }

    #[test]
    fn test_list_returns_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.create_customer(new_customer(name));
        }
        let names: Vec<_> = store.customers().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
