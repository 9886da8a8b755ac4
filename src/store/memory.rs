use super::{MailSettings, MailSettingsInput, NewUser, SettingsStore, User, UserStore};
use crate::error::{DugoutError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage backend
///
/// Holds both tables in process memory. Suitable for development and testing,
/// but rows are lost on restart and not shared across instances.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    settings: Vec<MailSettings>,
    users: Vec<User>,
    next_settings_id: i64,
    next_user_id: i64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn active_settings(&self) -> Result<Option<MailSettings>> {
        let tables = self.inner.read().await;
        Ok(tables.settings.iter().find(|s| s.active).cloned())
    }

    async fn first_settings(&self) -> Result<Option<MailSettings>> {
        let tables = self.inner.read().await;
        Ok(tables.settings.iter().min_by_key(|s| s.id).cloned())
    }

    async fn insert_settings(&self, input: MailSettingsInput) -> Result<MailSettings> {
        let mut tables = self.inner.write().await;
        tables.next_settings_id += 1;
        let row = MailSettings {
            id: tables.next_settings_id,
            username: input.username,
            password: input.password,
            from_email: input.from_email,
            smtp_host: input.smtp_host,
            port: input.port,
            ssl: input.ssl,
            active: true,
        };
        tables.settings.push(row.clone());
        Ok(row)
    }

    async fn update_first_settings(
        &self,
        input: MailSettingsInput,
    ) -> Result<Option<MailSettings>> {
        let mut tables = self.inner.write().await;
        let Some(row) = tables.settings.iter_mut().min_by_key(|s| s.id) else {
            return Ok(None);
        };
        row.username = input.username;
        row.password = input.password;
        row.from_email = input.from_email;
        row.smtp_host = input.smtp_host;
        row.port = input.port;
        row.ssl = input.ssl;
        Ok(Some(row.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn active_emails(&self) -> Result<Vec<String>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.active)
            .map(|u| u.email.clone())
            .collect())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut tables = self.inner.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(DugoutError::bad_request(format!(
                "Email already registered: {}",
                new_user.email
            )));
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            active: new_user.active,
            admin: new_user.admin,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}
