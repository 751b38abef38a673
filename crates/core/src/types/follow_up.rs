//! Follow-up domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{CustomerId, FollowUpId};

/// A scheduled follow-up with a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    /// Unique follow-up ID, assigned at creation and immutable.
    pub id: FollowUpId,
    /// The customer this follow-up belongs to. Soft reference: the store
    /// does not enforce that the customer exists.
    pub customer_id: CustomerId,
    /// What to talk about.
    pub notes: String,
    /// Workflow status, e.g. "pending" or "completed".
    pub status: String,
    /// When the follow-up is scheduled for.
    pub scheduled_date: DateTime<Utc>,
    /// When the follow-up was completed, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Opaque structured feedback captured on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<serde_json::Value>,
    /// When the record was created. Set once, immutable thereafter.
    pub created_at: DateTime<Utc>,
}

impl FollowUp {
    /// Default status for newly created follow-ups.
    pub const DEFAULT_STATUS: &'static str = "pending";
}

/// Payload for creating or updating a follow-up.
///
/// On create, a missing `status` defaults to [`FollowUp::DEFAULT_STATUS`].
/// On update, the double-option fields distinguish absent (preserve the
/// stored value) from an explicit `null` (clear it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFollowUp {
    pub customer_id: CustomerId,
    pub notes: String,
    #[serde(default)]
    pub status: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "crate::types::patch::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback: Option<Option<serde_json::Value>>,
}
