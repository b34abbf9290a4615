use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Contact, ContactDraft, ContactId},
    error::ApiError,
    protocol::{CreateContactResponse, CONTACTS_ROUTE},
};
use url::Url;

use crate::error::ClientError;

/// Remote operations the controller issues against the contact service.
#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>, ClientError>;
    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact, ClientError>;
    async fn delete_contact(&self, id: &ContactId) -> Result<(), ClientError>;
}

pub struct HttpContactApi {
    http: Client,
    base_url: Url,
}

impl HttpContactApi {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::CannotBeABase(base_url));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    fn contacts_url(&self) -> Result<Url, ClientError> {
        Ok(self.base_url.join(CONTACTS_ROUTE)?)
    }

    fn contact_url(&self, id: &ContactId) -> Result<Url, ClientError> {
        let mut url = self.contacts_url()?;
        url.path_segments_mut()
            .map_err(|()| ClientError::CannotBeABase(self.base_url.clone()))?
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl ContactApi for HttpContactApi {
    async fn list_contacts(&self) -> Result<Vec<Contact>, ClientError> {
        let response = self.http.get(self.contacts_url()?).send().await?;
        decode(response).await
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact, ClientError> {
        let response = self
            .http
            .post(self.contacts_url()?)
            .json(draft)
            .send()
            .await?;
        let body: CreateContactResponse = decode(response).await?;
        Ok(body.contact)
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<(), ClientError> {
        let response = self.http.delete(self.contact_url(id)?).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(ensure_success(response).await?.json().await?)
}

/// Passes a 2xx response through; otherwise reads the error envelope when there is one.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match response.json::<ApiError>().await {
        Ok(error) => Err(ClientError::Rejected {
            status: status.as_u16(),
            error,
        }),
        Err(_) => Err(ClientError::UnexpectedStatus(status.as_u16())),
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
