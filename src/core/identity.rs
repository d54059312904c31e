use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, Stream, StreamExt};
use log::{error, info, warn};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{Value, json};
use tokio::sync::watch;
use url::Url;

use crate::core::storage::SlotStorage;
use crate::error::{PlannerError, Result};
use crate::http::auth_middleware::TokenFn;
use crate::model::auth_user::{AuthUser, ErrorResponse, SignInResponse};

pub const AUTH_USER_KEY: &str = "authUser";
pub const DEFAULT_IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Lifetime assumed when the provider sends an unreadable `expiresIn`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
const MAX_TOKEN_LIFETIME_SECS: i64 = 30 * 24 * 3600;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Exchanges an OAuth id token from a federated provider such as `google.com`.
    async fn sign_in_with_idp(&self, provider_id: &str, oauth_id_token: &str) -> Result<AuthUser>;
}

/// Identity Toolkit REST client (the API behind Firebase Authentication).
pub struct FirebaseIdentity {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl FirebaseIdentity {
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        FirebaseIdentity {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, method: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/accounts:{}",
            self.base_url.trim_end_matches('/'),
            method
        ))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call(&self, method: &str, body: &Value) -> Result<AuthUser> {
        let response = self.client.post(self.endpoint(method)?).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(body) => PlannerError::auth(body.error.code, body.error.message),
                Err(_) => PlannerError::Status(status),
            });
        }
        let data: SignInResponse = response.json().await?;
        Ok(user_from_response(data, Utc::now()))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.call("signInWithPassword", &body).await
    }

    async fn sign_in_with_idp(&self, provider_id: &str, oauth_id_token: &str) -> Result<AuthUser> {
        let post_body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", oauth_id_token)
            .append_pair("providerId", provider_id)
            .finish();
        let body = json!({
            "postBody": post_body,
            "requestUri": "http://localhost",
            "returnSecureToken": true,
            "returnIdpCredential": true,
        });
        self.call("signInWithIdp", &body).await
    }
}

pub fn user_from_response(data: SignInResponse, now: DateTime<Utc>) -> AuthUser {
    let lifetime = data
        .expires_in
        .trim()
        .parse::<i64>()
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
        .clamp(0, MAX_TOKEN_LIFETIME_SECS);
    let provider_id = data
        .provider_id
        .or_else(|| sign_in_provider(&data.id_token));
    AuthUser {
        uid: data.local_id,
        email: data.email,
        display_name: data.display_name,
        provider_id,
        id_token: data.id_token,
        refresh_token: data.refresh_token,
        expires_at: now + Duration::seconds(lifetime),
    }
}

/// Reads the `firebase.sign_in_provider` claim from a JWT payload without
/// verifying it. The value is only used for display.
pub fn sign_in_provider(id_token: &str) -> Option<String> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims
        .get("firebase")?
        .get("sign_in_provider")?
        .as_str()
        .map(str::to_string)
}

/// Tracks the signed-in user, persists it in the `authUser` slot and
/// notifies subscribers on every change.
pub struct AuthSession {
    provider: Arc<dyn IdentityProvider>,
    storage: Arc<dyn SlotStorage>,
    state: watch::Sender<Option<AuthUser>>,
}

impl AuthSession {
    pub fn new(provider: Arc<dyn IdentityProvider>, storage: Arc<dyn SlotStorage>) -> Self {
        let (state, _) = watch::channel(None);
        AuthSession {
            provider,
            storage,
            state,
        }
    }

    /// Loads the persisted user. Expired or unreadable entries count as signed out.
    pub fn restore(&self) -> Option<AuthUser> {
        let user = self.storage.get_item(AUTH_USER_KEY).and_then(|raw| {
            match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) if user.is_expired(Utc::now()) => {
                    info!("stored session for {} has expired", user.friendly_name());
                    None
                }
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("ignoring unreadable {} slot: {}", AUTH_USER_KEY, err);
                    None
                }
            }
        });
        self.state.send_replace(user.clone());
        user
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    /// Token source for [`crate::http::build_client`].
    pub fn token_source(&self) -> TokenFn {
        let rx = self.state.subscribe();
        Arc::new(move || rx.borrow().as_ref().map(|user| user.id_token.clone()))
    }

    /// Emits the current user immediately, then once per sign-in or sign-out.
    pub fn changes(&self) -> impl Stream<Item = Option<AuthUser>> + Send + use<> {
        let rx = self.state.subscribe();
        let current = rx.borrow().clone();
        stream::once(async move { current }).chain(stream::unfold(rx, |mut rx| async move {
            rx.changed().await.ok()?;
            let user = rx.borrow_and_update().clone();
            Some((user, rx))
        }))
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser> {
        let result = self.provider.sign_in_with_password(email, password).await;
        self.accept(result)
    }

    pub async fn sign_in_with_idp(&self, provider_id: &str, oauth_id_token: &str) -> Result<AuthUser> {
        let result = self.provider.sign_in_with_idp(provider_id, oauth_id_token).await;
        self.accept(result)
    }

    /// Storage failures are logged and otherwise ignored; the in-memory
    /// session is always cleared.
    pub fn sign_out(&self) {
        if let Err(err) = self.storage.remove_item(AUTH_USER_KEY) {
            error!("error signing out: {}", err);
        }
        if self.state.send_replace(None).is_some() {
            info!("signed out");
        }
    }

    fn accept(&self, result: Result<AuthUser>) -> Result<AuthUser> {
        match result {
            Ok(user) => {
                match serde_json::to_string(&user) {
                    Ok(json) => {
                        if let Err(err) = self.storage.set_item(AUTH_USER_KEY, &json) {
                            warn!("signed in but could not persist the session: {}", err);
                        }
                    }
                    Err(err) => warn!("signed in but could not encode the session: {}", err),
                }
                info!("logged in: {}", user.email.as_deref().unwrap_or(user.uid.as_str()));
                self.state.send_replace(Some(user.clone()));
                Ok(user)
            }
            Err(err) => {
                error!("login failed: {}", err);
                Err(err)
            }
        }
    }
}
