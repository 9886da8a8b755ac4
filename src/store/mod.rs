//! Stored rows and storage traits.
//!
//! Two small tables back the application: the outbound mail settings edited
//! through the config form, and the user accounts that log in and receive the
//! digest. Storage sits behind traits so durable backends can be swapped in;
//! the in-memory backend ships with the crate.

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;

/// A stored outbound-mail configuration row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MailSettings {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub smtp_host: String,
    pub port: u16,
    /// `true` selects an implicit-TLS transport; `false` a plaintext one.
    pub ssl: bool,
    /// Only an active row is consulted when sending.
    pub active: bool,
}

/// Field set for inserting or replacing a mail settings row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettingsInput {
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub smtp_host: String,
    pub port: u16,
    pub ssl: bool,
}

/// A user account: may log in, may administer the config, may receive the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    /// Inactive users keep their account but drop off the recipient list.
    pub active: bool,
    pub admin: bool,
}

/// Field set for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub active: bool,
    pub admin: bool,
}

/// Storage operations for the outbound mail configuration.
///
/// The application treats the table as effectively single-row: the config form
/// refuses a second insert, and edits replace the first row by id.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The row consulted when sending mail, if any.
    async fn active_settings(&self) -> Result<Option<MailSettings>>;

    /// The first row ordered by id, shown and edited by the config form.
    async fn first_settings(&self) -> Result<Option<MailSettings>>;

    /// Whether any row exists at all.
    async fn any_settings(&self) -> Result<bool> {
        Ok(self.first_settings().await?.is_some())
    }

    /// Insert a new row, active by default.
    async fn insert_settings(&self, input: MailSettingsInput) -> Result<MailSettings>;

    /// Replace the fields of the first row. Returns the updated row, or
    /// `None` when there is nothing to update.
    async fn update_first_settings(
        &self,
        input: MailSettingsInput,
    ) -> Result<Option<MailSettings>>;
}

/// Storage operations for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email address (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Email addresses of all active users, in insertion order.
    async fn active_emails(&self) -> Result<Vec<String>>;

    /// Create a user. Fails when the email is already taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
}
