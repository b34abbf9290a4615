use std::sync::Arc;

use shared::domain::{ContactField, ContactId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    api::ContactApi,
    state::{Action, Command, ContactBookState, Notice},
};

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Notice(Notice),
}

/// Owns the session state and runs the commands its reducer asks for.
///
/// The state lock is only held for a single reducer step, never across a request.
pub struct ContactController {
    api: Arc<dyn ContactApi>,
    state: Mutex<ContactBookState>,
    events: broadcast::Sender<ClientEvent>,
}

impl ContactController {
    pub fn new(api: Arc<dyn ContactApi>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            state: Mutex::new(ContactBookState::default()),
            events,
        }
    }

    /// Initial fetch of the contact list. Call once before the first render.
    pub async fn initialize(&self) {
        self.dispatch(Action::Load).await;
    }

    pub async fn refresh(&self) {
        self.dispatch(Action::Load).await;
    }

    pub async fn edit_field(&self, field: ContactField, value: impl Into<String>) {
        self.dispatch(Action::EditField {
            field,
            value: value.into(),
        })
        .await;
    }

    pub async fn submit(&self) {
        self.dispatch(Action::Submit).await;
    }

    pub async fn delete(&self, id: ContactId) {
        self.dispatch(Action::Delete(id)).await;
    }

    pub async fn dispatch(&self, action: Action) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(command) = self.apply(action).await {
                next = Some(self.execute(command).await);
            }
        }
    }

    pub async fn snapshot(&self) -> ContactBookState {
        self.state.lock().await.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    async fn apply(&self, action: Action) -> Option<Command> {
        let (command, notices) = {
            let mut state = self.state.lock().await;
            let command = state.reduce(action);
            (command, state.take_notices())
        };
        for notice in notices {
            let _ = self.events.send(ClientEvent::Notice(notice));
        }
        command
    }

    async fn execute(&self, command: Command) -> Action {
        match command {
            Command::FetchContacts => {
                let result = self.api.list_contacts().await;
                match &result {
                    Ok(contacts) => debug!(count = contacts.len(), "contacts fetched"),
                    Err(error) => warn!(%error, "fetching contacts failed"),
                }
                Action::ContactsLoaded(result)
            }
            Command::CreateContact(draft) => {
                let result = self.api.create_contact(&draft).await;
                match &result {
                    Ok(contact) => info!(contact_id = %contact.id, "contact created"),
                    Err(error) => warn!(%error, "creating contact failed"),
                }
                Action::ContactCreated(result)
            }
            Command::DeleteContact(id) => {
                let result = self.api.delete_contact(&id).await;
                match &result {
                    Ok(()) => info!(contact_id = %id, "contact deleted"),
                    Err(error) => warn!(contact_id = %id, %error, "deleting contact failed"),
                }
                Action::ContactDeleted { id, result }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
