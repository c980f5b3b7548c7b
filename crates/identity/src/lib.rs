//! External-principal resolution.
//!
//! Requests arrive carrying an opaque principal id issued by the external
//! identity platform. Nothing else about the caller is trusted from the
//! request; the principal is resolved against the platform for a primary
//! email, and that email is the bridge to the local users table.

use futures_util::future::BoxFuture;
use roster_config::IdentityConfig;
use roster_database::entities::User;
use roster_database::repos::UserRepository;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Request carries no principal")]
    Unauthenticated,

    #[error("Principal has no primary email address")]
    NoEmail,

    #[error("No local account for this principal")]
    NoLocalUser,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IdentityError {
    /// Stable code surfaced to callers in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::Unauthenticated => "UNAUTHENTICATED",
            IdentityError::NoEmail => "NO_EMAIL",
            IdentityError::NoLocalUser => "NO_LOCAL_USER",
            IdentityError::Provider(_) | IdentityError::Database(_) => "INTERNAL",
        }
    }
}

/// The slice of the provider's user record we care about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUser {
    pub primary_email_address: Option<String>,
}

/// Source of provider user records. Boxed futures keep the trait usable
/// behind `Arc<dyn IdentityProvider>` in shared state.
pub trait IdentityProvider: Send + Sync {
    fn fetch_user<'a>(
        &'a self,
        external_id: &'a str,
    ) -> BoxFuture<'a, Result<ProviderUser, IdentityError>>;
}

/// Talks to the identity platform's REST API.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl IdentityProvider for HttpIdentityProvider {
    fn fetch_user<'a>(
        &'a self,
        external_id: &'a str,
    ) -> BoxFuture<'a, Result<ProviderUser, IdentityError>> {
        Box::pin(async move {
            let url = format!("{}/users/{}", self.base_url, external_id);

            let mut request = self.client.get(&url);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| IdentityError::Provider(e.to_string()))?;

            if !response.status().is_success() {
                warn!(external_id, status = %response.status(), "identity lookup failed");
                return Err(IdentityError::Provider(format!(
                    "identity platform returned {}",
                    response.status()
                )));
            }

            response
                .json::<ProviderUser>()
                .await
                .map_err(|e| IdentityError::Provider(e.to_string()))
        })
    }
}

/// Fixed principal-to-email table for development and tests.
#[derive(Default)]
pub struct StaticIdentityProvider {
    emails: HashMap<String, String>,
}

impl StaticIdentityProvider {
    pub fn new(emails: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            emails: emails.into_iter().collect(),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn fetch_user<'a>(
        &'a self,
        external_id: &'a str,
    ) -> BoxFuture<'a, Result<ProviderUser, IdentityError>> {
        Box::pin(async move {
            Ok(ProviderUser {
                primary_email_address: self.emails.get(external_id).cloned(),
            })
        })
    }
}

/// Resolves an incoming principal id to the local user account.
#[derive(Clone)]
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    users: UserRepository,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>, users: UserRepository) -> Self {
        Self { provider, users }
    }

    /// Principal id -> provider primary email -> local user. Every step that
    /// comes up empty has its own terminal error so callers can tell an
    /// anonymous request from an un-onboarded one.
    pub async fn resolve(&self, external_id: Option<&str>) -> Result<User, IdentityError> {
        let external_id = external_id.ok_or(IdentityError::Unauthenticated)?;

        let provider_user = self.provider.fetch_user(external_id).await?;
        let email = provider_user
            .primary_email_address
            .ok_or(IdentityError::NoEmail)?;

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| IdentityError::Database(e.to_string()))?
            .ok_or(IdentityError::NoLocalUser)?;

        debug!(external_id, user_id = user.id, "resolved principal");
        Ok(user)
    }
}
