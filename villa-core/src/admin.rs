use crate::config::AdminConfig;
use crate::errors::{ErrorKind, FieldErrors};
use crate::store::{PropertyDraft, SharedPropertyStore};
use crate::types::Property;
use crate::Result;
use std::time::Duration;
use tracing::{info, warn};

/// Credential check in front of the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminGate {
    credentials: AdminConfig,
    delay: Duration,
}

impl AdminGate {
    pub fn new(credentials: AdminConfig, delay: Duration) -> Self {
        AdminGate { credentials, delay }
    }

    /// Synchronous half of [`AdminGate::login`], without the artificial wait.
    pub fn verify(&self, username: &str, password: &str) -> Result<()> {
        let mut errors = FieldErrors::default();
        if username.trim().is_empty() {
            errors.push("username", "is required");
        }
        if password.is_empty() {
            errors.push("password", "is required");
        }
        errors.into_result()?;
        if username == self.credentials.username && password == self.credentials.password {
            Ok(())
        } else {
            warn!("Rejected admin login for {username}");
            Err(ErrorKind::InvalidCredentials.into())
        }
    }

    /// Waits the configured delay, then checks the pair.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        store: SharedPropertyStore,
    ) -> Result<AdminSession> {
        tokio::time::sleep(self.delay).await;
        self.verify(username, password)?;
        info!("Admin {username} logged in");
        Ok(AdminSession {
            username: username.to_string(),
            store,
        })
    }
}

/// Proof of a successful login; the only way to mutate the store from the
/// dashboard.
#[derive(Debug, Clone)]
pub struct AdminSession {
    username: String,
    store: SharedPropertyStore,
}

impl AdminSession {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn properties(&self) -> Vec<Property> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .all()
            .to_vec()
    }

    pub fn add_property(&self, draft: PropertyDraft) -> Result<Property> {
        let mut store = self
            .store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        store.add(draft)
    }

    /// Callers confirm with the user before this runs.
    pub fn delete_property(&self, id: &str) -> Result<Property> {
        let mut store = self
            .store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        store.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Catalog;
    use crate::store::PropertyStore;
    use tokio::time::Instant;

    fn gate() -> AdminGate {
        AdminGate::new(AdminConfig::default(), Duration::from_millis(800))
    }

    fn store() -> SharedPropertyStore {
        PropertyStore::seeded(&Catalog::seed()).shared()
    }

    #[test]
    fn wrong_password_is_rejected_with_message() {
        let err = gate().verify("admin", "nope").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidCredentials));
        assert_eq!(
            err.to_string(),
            "Invalid username or password. Please try again."
        );
    }

    #[test]
    fn blank_fields_are_validation_errors() {
        let err = gate().verify("", "").unwrap_err();
        match err.kind() {
            ErrorKind::Validation(errors) => {
                assert!(errors.has("username"));
                assert!(errors.has("password"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_then_opens_session() {
        let started = Instant::now();
        let session = gate().login("admin", "admin", store()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
        assert_eq!(session.username(), "admin");
        assert_eq!(session.properties().len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn session_mutations_reach_shared_store() {
        let shared = store();
        let session = gate().login("admin", "admin", shared.clone()).await.unwrap();
        let added = session
            .add_property(PropertyDraft {
                title: "Hilltop Plot".to_string(),
                price: "₹ 12 L".to_string(),
                location: "Karjat".to_string(),
                ..Default::default()
            })
            .unwrap();
        session.delete_property("h1").unwrap();

        let store = shared.lock().unwrap();
        assert!(store.contains(&added.id));
        assert!(!store.contains("h1"));
        assert_eq!(store.len(), 8);
    }

    #[tokio::test]
    async fn custom_credentials_replace_defaults() {
        let gate = AdminGate::new(
            AdminConfig {
                username: "owner".to_string(),
                password: "hunter2".to_string(),
            },
            Duration::ZERO,
        );
        assert!(gate.login("admin", "admin", store()).await.is_err());
        assert!(gate.login("owner", "hunter2", store()).await.is_ok());
    }
}
