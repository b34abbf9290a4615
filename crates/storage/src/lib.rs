use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::domain::{Contact, ContactDraft, ContactId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own empty database.
        let max_connections = if database_url.starts_with("sqlite::memory:") {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Persists an already validated draft. Identity and creation time are assigned here.
    pub async fn insert_contact(&self, draft: &ContactDraft) -> Result<Contact> {
        let contact = Contact {
            id: ContactId::generate(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            message: draft.message.clone(),
            created_at: Utc::now().trunc_subsecs(3),
        };

        sqlx::query(
            "INSERT INTO contacts (id, name, email, phone, message, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(contact.id.as_str())
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.message)
        .bind(contact.created_at)
        .execute(&self.pool)
        .await
        .context("failed to insert contact")?;

        debug!(contact_id = %contact.id, "contact inserted");
        Ok(contact)
    }

    /// All contacts, newest first.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, message, created_at
             FROM contacts
             ORDER BY seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list contacts")?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    /// Returns whether a row was removed.
    pub async fn delete_contact(&self, id: &ContactId) -> Result<bool> {
        let removed = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete contact {id}"))?
            .rows_affected();
        Ok(removed > 0)
    }
}

fn contact_from_row(r: &SqliteRow) -> Contact {
    Contact {
        id: ContactId(r.get::<String, _>(0)),
        name: r.get::<String, _>(1),
        email: r.get::<String, _>(2),
        phone: r.get::<String, _>(3),
        message: r.get::<String, _>(4),
        created_at: r.get::<DateTime<Utc>, _>(5),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
