//! Client side of the contact book: session state, its transitions, and the HTTP
//! transport used to reconcile it with the server.

pub mod api;
pub mod controller;
pub mod error;
pub mod state;

pub use api::{ContactApi, HttpContactApi};
pub use controller::{ClientEvent, ContactController};
pub use error::ClientError;
pub use state::{Action, Command, ContactBookState, ContactForm, Notice, NoticeLevel};
