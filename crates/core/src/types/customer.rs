//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{CustomerId, ProductId};

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer ID, assigned at creation and immutable.
    pub id: CustomerId,
    /// Customer's name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-form notes about the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// IDs of products this customer has purchased, in purchase order.
    pub purchased_products: Vec<ProductId>,
    /// Optional satisfaction rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    /// When the customer last visited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,
    /// When the record was created. Set once, immutable thereafter.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or updating a customer.
///
/// Used for both create and update. The double-option fields distinguish an
/// absent field from an explicit `null`: on update, absent preserves the
/// stored value and `null` clears it. `purchased_products: None` preserves
/// the stored list while `Some(vec![])` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub purchased_products: Option<Vec<ProductId>>,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_visit: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_absent_optional_field_deserializes_to_none() {
        let payload: NewCustomer =
            serde_json::from_value(json!({"name": "Asha", "phone": "555-1111"}))
                .expect("valid payload");
        assert_eq!(payload.email, None);
        assert_eq!(payload.rating, None);
    }

    #[test]
    fn test_explicit_null_optional_field_deserializes_to_some_none() {
        let payload: NewCustomer = serde_json::from_value(
            json!({"name": "Asha", "phone": "555-1111", "email": null, "rating": null}),
        )
        .expect("valid payload");
        assert_eq!(payload.email, Some(None));
        assert_eq!(payload.rating, Some(None));
    }

    #[test]
    fn test_present_optional_field_deserializes_to_some_some() {
        let payload: NewCustomer = serde_json::from_value(
            json!({"name": "Asha", "phone": "555-1111", "email": "asha@example.com"}),
        )
        .expect("valid payload");
        assert_eq!(payload.email, Some(Some("asha@example.com".to_owned())));
    }
}
