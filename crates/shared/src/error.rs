use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ContactField;

/// Field-keyed validation messages.
pub type FieldErrors = BTreeMap<ContactField, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPayload,
    NotFound,
    StorageUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn invalid_payload(fields: FieldErrors) -> Self {
        let names = fields
            .keys()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            code: ErrorCode::InvalidPayload,
            message: format!("invalid contact fields: {names}"),
            fields,
        }
    }

    pub fn storage_unavailable() -> Self {
        Self::new(ErrorCode::StorageUnavailable, "contact store is unavailable")
    }
}
