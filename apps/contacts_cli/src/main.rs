use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientEvent, ContactController, HttpContactApi, NoticeLevel};
use shared::domain::{ContactField, ContactId};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "contacts", about = "Manage contacts on a contact book server")]
struct Args {
    #[arg(long, env = "CONTACTS_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every contact, newest first.
    List,
    /// Add a contact. Non-digit characters in the phone number are dropped.
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Delete a contact by id.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    tracing::debug!(server_url = %args.server_url, "contacts cli starting");

    let controller = ContactController::new(Arc::new(HttpContactApi::new(&args.server_url)?));
    let mut events = controller.subscribe_events();

    controller.initialize().await;
    let mut failed = print_notices(&mut events);

    match args.command {
        Command::List => {}
        Command::Add {
            name,
            email,
            phone,
            message,
        } => {
            controller.edit_field(ContactField::Name, name).await;
            controller.edit_field(ContactField::Email, email).await;
            controller.edit_field(ContactField::Phone, phone).await;
            controller.edit_field(ContactField::Message, message).await;
            controller.submit().await;
        }
        Command::Delete { id } => controller.delete(ContactId(id)).await,
    }
    failed |= print_notices(&mut events);

    let state = controller.snapshot().await;
    if !state.errors.is_empty() {
        eprint!("{}", render::format_field_errors(&state.errors));
        failed = true;
    }
    print!("{}", render::format_table(&state.contacts));

    if failed {
        bail!("contacts command failed");
    }
    Ok(())
}

/// Prints pending notices; returns whether any reported a failure.
fn print_notices(events: &mut broadcast::Receiver<ClientEvent>) -> bool {
    let mut failed = false;
    loop {
        match events.try_recv() {
            Ok(ClientEvent::Notice(notice)) => match notice.level {
                NoticeLevel::Success => println!("{}", notice.message),
                NoticeLevel::Error => {
                    eprintln!("error: {}", notice.message);
                    failed = true;
                }
            },
            Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    failed
}
