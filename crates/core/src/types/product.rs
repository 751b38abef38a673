//! Product domain types.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID, assigned at creation and immutable.
    pub id: ProductId,
    /// Product name, unique case-insensitively among products.
    pub name: String,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
}
