use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use moka::future::Cache;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::gateway::GatewayError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const ASSERTION_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Access tokens live for an hour; the cache drops them a little earlier
/// so an in-flight submission never carries an expired one.
static TOKEN_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(8)
        .time_to_live(Duration::from_secs(3300))
        .build()
});

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: usize,
    exp: usize,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Mints service-account bearer tokens for the Sheets scope.
pub struct TokenProvider {
    http: reqwest::Client,
    client_email: String,
    signing_key: EncodingKey,
}

impl TokenProvider {
    pub fn new(
        http: reqwest::Client,
        client_email: String,
        private_key_pem: &str,
    ) -> Result<Self, GatewayError> {
        let signing_key =
            EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
                GatewayError::Auth {
                    message: format!("invalid service account key: {}", e),
                }
            })?;
        Ok(Self {
            http,
            client_email,
            signing_key,
        })
    }

    pub async fn access_token(&self) -> Result<String, GatewayError> {
        if let Some(token) = TOKEN_CACHE.get(&self.client_email).await {
            return Ok(token);
        }

        let token = self.mint().await?;
        TOKEN_CACHE
            .insert(self.client_email.clone(), token.clone())
            .await;
        Ok(token)
    }

    /// Sign an RS256 assertion and trade it for a bearer token.
    async fn mint(&self) -> Result<String, GatewayError> {
        let issued_at = now();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: issued_at,
            exp: issued_at + 3600,
        };

        let assertion =
            encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key).map_err(|e| {
                GatewayError::Auth {
                    message: format!("failed to sign token assertion: {}", e),
                }
            })?;

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", ASSERTION_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Auth {
                message: format!("token endpoint returned {}: {}", status, message),
            });
        }

        let body: TokenResponse = response.json().await?;
        Ok(body.access_token)
    }
}
