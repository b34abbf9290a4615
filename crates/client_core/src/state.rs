//! Session state for the contact book and its reducer.
//!
//! `ContactBookState::reduce` is pure: it never performs I/O. Network work is requested by
//! returning a [`Command`], and its outcome comes back as another [`Action`]. The contact list
//! only changes in response to confirmed server results.

use std::collections::HashSet;

use shared::{
    domain::{Contact, ContactDraft, ContactField, ContactId},
    error::FieldErrors,
    validation::{sanitize_phone, validate_draft},
};

use crate::error::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    /// Phone input keeps digits only.
    pub fn set(&mut self, field: ContactField, value: &str) {
        match field {
            ContactField::Name => self.name = value.to_string(),
            ContactField::Email => self.email = value.to_string(),
            ContactField::Phone => self.phone = sanitize_phone(value),
            ContactField::Message => self.message = value.to_string(),
        }
    }

    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Load,
    EditField { field: ContactField, value: String },
    Submit,
    Delete(ContactId),
    ContactsLoaded(Result<Vec<Contact>, ClientError>),
    ContactCreated(Result<Contact, ClientError>),
    ContactDeleted {
        id: ContactId,
        result: Result<(), ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchContacts,
    CreateContact(ContactDraft),
    DeleteContact(ContactId),
}

#[derive(Debug, Clone, Default)]
pub struct ContactBookState {
    /// Newest first.
    pub contacts: Vec<Contact>,
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub loading: bool,
    pub submitting: bool,
    pub deleting: HashSet<ContactId>,
    notices: Vec<Notice>,
}

impl ContactBookState {
    pub fn reduce(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Load => {
                if self.loading {
                    return None;
                }
                self.loading = true;
                Some(Command::FetchContacts)
            }
            Action::EditField { field, value } => {
                self.form.set(field, &value);
                None
            }
            Action::Submit => {
                if self.submitting {
                    return None;
                }
                let draft = self.form.to_draft();
                if let Err(errors) = validate_draft(&draft) {
                    self.errors = errors;
                    return None;
                }
                self.errors.clear();
                self.submitting = true;
                Some(Command::CreateContact(draft))
            }
            Action::Delete(id) => {
                if !self.deleting.insert(id.clone()) {
                    return None;
                }
                Some(Command::DeleteContact(id))
            }
            Action::ContactsLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(contacts) => {
                        self.contacts = contacts;
                        self.notices
                            .push(Notice::success("Contacts fetched successfully!"));
                    }
                    Err(err) => self
                        .notices
                        .push(Notice::error(format!("Failed to fetch contacts: {err}"))),
                }
                None
            }
            Action::ContactCreated(result) => {
                self.submitting = false;
                match result {
                    Ok(contact) => {
                        // A refresh answered after the insert may already list it.
                        if !self.contacts.iter().any(|existing| existing.id == contact.id) {
                            self.contacts.insert(0, contact);
                        }
                        self.form = ContactForm::default();
                        self.errors.clear();
                        self.notices.push(Notice::success("Contact added successfully!"));
                    }
                    Err(err) => {
                        if let Some(fields) = err.field_errors() {
                            self.errors = fields.clone();
                        }
                        self.notices
                            .push(Notice::error(format!("Failed to add contact: {err}")));
                    }
                }
                None
            }
            Action::ContactDeleted { id, result } => {
                self.deleting.remove(&id);
                match result {
                    Ok(()) => {
                        self.contacts.retain(|contact| contact.id != id);
                        self.notices
                            .push(Notice::success("Contact deleted successfully!"));
                    }
                    Err(err) => self
                        .notices
                        .push(Notice::error(format!("Failed to delete contact: {err}"))),
                }
                None
            }
        }
    }

    pub fn is_deleting(&self, id: &ContactId) -> bool {
        self.deleting.contains(id)
    }

    /// Drains notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
