use serde::{Deserialize, Serialize};

use crate::domain::{Contact, ContactId};

pub const CONTACTS_ROUTE: &str = "/api/contacts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactResponse {
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteContactResponse {
    pub id: ContactId,
    /// `false` when no contact with this id existed.
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn running() -> Self {
        Self {
            status: "running".to_string(),
        }
    }
}
