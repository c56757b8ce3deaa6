//! Account endpoints. A successful login or registration stores the
//! returned bearer token on the client.

use crate::client::StorefrontClient;
use crate::wire::{AuthResponse, Credentials, Registration, User};
use butler_core::StoreResult;
use tracing::{info, instrument};

impl StorefrontClient {
    /// Register a new account
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> StoreResult<AuthResponse> {
        let response: AuthResponse = self.post("auth/register", registration).await?;
        self.remember_token(&response);
        Ok(response)
    }

    /// Log in with email and password
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> StoreResult<AuthResponse> {
        let response: AuthResponse = self.post("auth/login", credentials).await?;
        self.remember_token(&response);
        Ok(response)
    }

    /// The user the current token belongs to
    pub async fn current_user(&self) -> StoreResult<User> {
        self.get("auth/me").await
    }

    /// Forget the bearer token
    pub fn logout(&self) {
        self.set_token(None);
        info!("Logged out");
    }

    fn remember_token(&self, response: &AuthResponse) {
        if let Some(token) = &response.access_token {
            self.set_token(Some(token.clone()));
            info!("Stored access token");
        }
    }
}
