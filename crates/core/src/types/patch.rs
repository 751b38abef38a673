//! Serde support for update payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize into the outer layer of an `Option<Option<T>>` field.
///
/// Combined with `#[serde(default)]`, an absent field stays `None` while a
/// present field becomes `Some(..)` - including an explicit JSON `null`,
/// which becomes `Some(None)`. Update merges use the distinction: absent
/// preserves the stored value, `null` clears it.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
