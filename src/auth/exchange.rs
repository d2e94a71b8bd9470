//! OAuth2 password grant.
//!
//! Exchanges the API key and secret for an access token.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public OAuth client id published by the platform for API access.
///
/// Every tenant uses the same pair; tenant identity comes from the
/// key/secret sent in the grant body.
pub const OAUTH_CLIENT_ID: &str = "public-client";

/// Public OAuth client secret paired with [`OAUTH_CLIENT_ID`].
pub const OAUTH_CLIENT_SECRET: &str = "public";

/// Token lifetime assumed when the server omits `expires_in` (100 hours).
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 360_000;

/// OAuth password grant form body
#[derive(Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'a str,
    username: &'a str,
    password: &'a str,
}

/// OAuth token response
#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds; some deployments send a float or a string
    #[serde(default)]
    pub expires_in: Option<Value>,
}

/// A successfully issued token, before it is given an absolute expiry.
#[derive(Debug)]
pub(crate) struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Performs the password grant against `{api_base_url}/auth/oauth/token`.
///
/// # Returns
/// * `Ok(IssuedToken)` - Access token and lifetime
/// * `Err(Error::Authentication)` - Transport failure, non-2xx status, or a
///   response without an access token
pub(crate) async fn password_grant(
    http_client: &Client,
    credentials: &Credentials,
) -> Result<IssuedToken> {
    let token_url = credentials.token_url();
    let form = PasswordGrant {
        grant_type: "password",
        username: &credentials.api_key,
        password: &credentials.api_secret,
    };

    tracing::debug!(token_url = %token_url, "Requesting access token");

    let response = http_client
        .post(&token_url)
        .basic_auth(OAUTH_CLIENT_ID, Some(OAUTH_CLIENT_SECRET))
        .header("Accept", "application/json")
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Authentication(format!("token request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Authentication(format!("failed to read token response: {}", e)))?;

    if !status.is_success() {
        return Err(Error::Authentication(format!(
            "token exchange failed with status {}: {}",
            status, body
        )));
    }

    let token_response = parse_token_response(&body)?;
    let access_token = token_response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Authentication("no access token in response".to_string()))?;

    Ok(IssuedToken {
        access_token,
        token_type: token_response
            .token_type
            .unwrap_or_else(|| "bearer".to_string()),
        expires_in: token_response
            .expires_in
            .as_ref()
            .and_then(lifetime_secs)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS),
    })
}

/// Reads `expires_in` as whole seconds from an integer, a float (rounded)
/// or a numeric string. Anything else yields `None`.
fn lifetime_secs(value: &Value) -> Option<i64> {
    let secs = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(f64::round).and_then(finite_secs))?,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(f64::round).and_then(finite_secs))?
        }
        _ => return None,
    };
    Some(secs)
}

fn finite_secs(secs: f64) -> Option<i64> {
    (secs.is_finite() && secs.abs() < i64::MAX as f64).then_some(secs as i64)
}

/// Parses a token response body.
///
/// Accepts a JSON object, or a JSON string whose content is itself the
/// JSON object.
pub(crate) fn parse_token_response(body: &str) -> Result<TokenResponse> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| Error::Authentication(format!("failed to parse token response: {}", e)))?;

    let object = match parsed {
        Value::String(inner) => serde_json::from_str(&inner).map_err(|e| {
            Error::Authentication(format!("failed to parse token response: {}", e))
        })?,
        other => other,
    };

    serde_json::from_value(object)
        .map_err(|e| Error::Authentication(format!("failed to parse token response: {}", e)))
}
