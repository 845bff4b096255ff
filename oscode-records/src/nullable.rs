//! Optional text fields.
//!
//! The store writes unset optional strings either as a missing key or as an
//! explicit `null`. Both read back as an empty string.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
