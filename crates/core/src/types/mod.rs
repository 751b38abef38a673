//! Shared domain types.

pub mod customer;
pub mod follow_up;
pub mod id;
mod patch;
pub mod product;

pub use customer::{Customer, NewCustomer};
pub use follow_up::{FollowUp, NewFollowUp};
pub use id::{CustomerId, FollowUpId, ProductId};
pub use product::{NewProduct, Product};
