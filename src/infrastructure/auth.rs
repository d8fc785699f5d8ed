use crate::config::CdfConfig;
use crate::error::{Result, UploaderError};
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, RequestTokenError, Scope, TokenResponse,
    TokenUrl, basic::BasicClient, reqwest::async_http_client,
};
use tracing::{debug, info};

/// OAuth2 client-credentials exchange against the identity provider.
pub struct Authenticator {
    client: BasicClient,
    scopes: Vec<String>,
}

impl Authenticator {
    pub fn new(config: &CdfConfig) -> Result<Self> {
        let auth_url = AuthUrl::new(config.auth_url())
            .map_err(|e| UploaderError::Config(format!("Invalid authorization URL: {}", e)))?;
        let token_url = TokenUrl::new(config.token_url())
            .map_err(|e| UploaderError::Config(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            client,
            scopes: config.scopes(),
        })
    }

    /// Requests a fresh bearer token.
    pub async fn fetch_token(&self) -> Result<String> {
        let mut request = self.client.exchange_client_credentials();
        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        debug!(scopes = ?self.scopes, "Requesting client-credentials token");

        let token = request
            .request_async(async_http_client)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(response) => {
                    let detail = response
                        .error_description()
                        .map(|d| format!(": {}", d))
                        .unwrap_or_default();
                    UploaderError::Auth(format!("{}{}", response.error(), detail))
                }
                other => UploaderError::Auth(format!(
                    "{} (check the client id/secret, tenant id and network access)",
                    other
                )),
            })?;

        info!("🔐 Obtained access token");
        Ok(token.access_token().secret().clone())
    }
}
