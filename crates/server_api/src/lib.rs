use shared::{
    domain::{Contact, ContactDraft, ContactId},
    error::ApiError,
    protocol::DeleteContactResponse,
    validation::validate_draft,
};
use storage::Storage;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_contacts(ctx: &ApiContext) -> Result<Vec<Contact>, ApiError> {
    ctx.storage.list_contacts().await.map_err(internal)
}

pub async fn create_contact(ctx: &ApiContext, draft: ContactDraft) -> Result<Contact, ApiError> {
    if let Err(fields) = validate_draft(&draft) {
        let rejected: Vec<_> = fields.keys().collect();
        debug!(fields = ?rejected, "rejected contact payload");
        return Err(ApiError::invalid_payload(fields));
    }

    let contact = ctx.storage.insert_contact(&draft).await.map_err(internal)?;
    info!(contact_id = %contact.id, "contact created");
    Ok(contact)
}

/// Deleting an id that does not exist succeeds with `removed: false`.
pub async fn delete_contact(
    ctx: &ApiContext,
    id: ContactId,
) -> Result<DeleteContactResponse, ApiError> {
    let removed = ctx.storage.delete_contact(&id).await.map_err(internal)?;
    if removed {
        info!(contact_id = %id, "contact deleted");
    } else {
        debug!(contact_id = %id, "delete target not found; treating as success");
    }
    Ok(DeleteContactResponse { id, removed })
}

fn internal(err: anyhow::Error) -> ApiError {
    let error = format!("{err:#}");
    error!(%error, "contact store operation failed");
    ApiError::storage_unavailable()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
