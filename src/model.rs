//! Entities handed to the persistence store, one pair per imported row.

use serde::{Deserialize, Serialize};

/// Postal address owned by exactly one [`User`]; built fresh per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub post_code: Option<String>,
    pub country: Option<String>,
}

/// Imported user record. `id` is `None` until the store assigns identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Address,
}
