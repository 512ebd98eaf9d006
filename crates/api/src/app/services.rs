//! Application wiring: store selection, dispatcher, users and token issuer.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use bistro_application::{DispatchError, Dispatcher, Request, RestaurantStore, StoreError, restaurants};
use bistro_auth::{InMemoryUserDirectory, JwtIssuer, JwtSettings};
use bistro_core::Outcome;
use bistro_infra::{InMemoryRestaurantStore, PostgresRestaurantStore, seed_sample_data};

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store initialisation failed: {0}")]
    Store(#[from] StoreError),
    #[error("dispatcher wiring incomplete: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Shared per-process services handed to every route.
pub struct AppServices {
    dispatcher: Dispatcher,
    users: InMemoryUserDirectory,
    issuer: JwtIssuer,
}

impl AppServices {
    /// Wire the restaurant handlers over `store` and verify every routed
    /// request type has a handler.
    pub fn new(store: Arc<dyn RestaurantStore>, jwt: &JwtSettings) -> Result<Self, DispatchError> {
        let dispatcher = restaurants::register(Dispatcher::builder(), store).build();
        restaurants::ensure_registered(&dispatcher)?;

        Ok(Self {
            dispatcher,
            users: InMemoryUserDirectory::default(),
            issuer: JwtIssuer::new(jwt),
        })
    }

    /// In-memory store, empty. Used by tests and local runs without a
    /// database.
    pub fn in_memory(jwt: &JwtSettings) -> Result<Self, DispatchError> {
        Self::new(Arc::new(InMemoryRestaurantStore::new()), jwt)
    }

    pub fn with_users(mut self, users: InMemoryUserDirectory) -> Self {
        self.users = users;
        self
    }

    pub fn users(&self) -> &InMemoryUserDirectory {
        &self.users
    }

    pub fn issuer(&self) -> &JwtIssuer {
        &self.issuer
    }

    /// Send `request` with a token that is cancelled if the calling future
    /// is dropped before completion (client went away).
    pub async fn dispatch<R: Request>(&self, request: R) -> Result<Outcome<R::Response>, DispatchError> {
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        let result = self.dispatcher.send(request, &cancel).await;
        guard.disarm();
        result
    }
}

/// Build services from process settings: Postgres when `DATABASE_URL` is
/// set (schema bootstrapped on startup), otherwise the in-memory store.
pub async fn build_services(settings: &Settings) -> Result<AppServices, StartupError> {
    let store: Arc<dyn RestaurantStore> = match &settings.database_url {
        Some(url) => {
            let store = PostgresRestaurantStore::connect(url).await?;
            store.ensure_schema().await?;
            tracing::info!("using postgres restaurant store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory restaurant store");
            Arc::new(InMemoryRestaurantStore::new())
        }
    };

    if settings.seed_sample_data {
        seed_sample_data(store.as_ref(), &CancellationToken::new()).await?;
    }

    Ok(AppServices::new(store, &settings.jwt)?)
}

#[cfg(test)]
mod tests {
    use bistro_application::restaurants::GetRestaurants;

    use super::*;

    fn jwt() -> JwtSettings {
        JwtSettings {
            issuer: "bistro".to_string(),
            audience: "bistro-api".to_string(),
            signing_key: "test-secret".to_string(),
            expiry_minutes: 5,
        }
    }

    #[tokio::test]
    async fn in_memory_services_answer_queries() {
        let services = AppServices::in_memory(&jwt()).unwrap();
        let outcome = services.dispatch(GetRestaurants).await.unwrap();
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn default_users_can_log_in() {
        let services = AppServices::in_memory(&jwt()).unwrap();
        assert!(services.users().authenticate("ADMIN", "admin123").is_some());
        assert!(services.users().authenticate("admin", "wrong").is_none());
    }
}
