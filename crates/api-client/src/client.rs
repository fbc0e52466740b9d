use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use taskdeck_api::{AuthErrorBody, Credentials, Identity, RecoverRequest, TokenResponse};

use crate::events::AuthEvents;

/// Errors surfaced by the backend client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Backend { status: StatusCode, message: String },
    #[error("no matching row")]
    NotFound,
}

impl ClientError {
    /// Transport failures and server-side errors are worth retrying; client
    /// errors and missing rows are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Backend { status, .. } => status.is_server_error(),
            Self::NotFound => false,
        }
    }
}

/// Typed HTTP client for the hosted backend.
///
/// One client speaks both surfaces: the auth endpoints under `/auth/v1` and
/// the table-style REST endpoints under `/rest/v1`. Every request carries the
/// public anon key; requests made after sign-in carry the user's access token
/// as the bearer. Successful auth operations publish a sequence-stamped
/// report through [`AuthEvents`].
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    events: AuthEvents,
}

impl BackendClient {
    /// Create a new client with the given base URL, anon key, and timeout.
    pub fn new(
        base_url: &str,
        anon_key: &str,
        timeout: Duration,
        events: AuthEvents,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: None,
            events,
        })
    }

    pub fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    /// Bearer sent on REST calls: the user token when signed in, otherwise the
    /// anon key (the backend scopes anonymous access by policy).
    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    /// Register a new identity. On success the client is signed in as the new
    /// user and an auth-state change is published.
    pub async fn sign_up(&mut self, credentials: &Credentials) -> Result<TokenResponse, ClientError> {
        let resp = self
            .client
            .post(self.auth_url("/signup"))
            .header("apikey", &self.anon_key)
            .json(credentials)
            .send()
            .await?;
        let token: TokenResponse = parse_response(resp).await?;
        self.access_token = Some(token.access_token.clone());
        self.events.publish(Some(token.user.clone()));
        Ok(token)
    }

    /// Password sign-in. On success the client holds the access token and an
    /// auth-state change is published.
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<TokenResponse, ClientError> {
        let resp = self
            .client
            .post(format!("{}?grant_type=password", self.auth_url("/token")))
            .header("apikey", &self.anon_key)
            .json(credentials)
            .send()
            .await?;
        let token: TokenResponse = parse_response(resp).await?;
        self.access_token = Some(token.access_token.clone());
        self.events.publish(Some(token.user.clone()));
        Ok(token)
    }

    /// Sign out. Idempotent: the local token is always cleared and a null
    /// identity published, even when there is no active session or the
    /// server-side revocation fails.
    pub async fn sign_out(&mut self) {
        if let Some(token) = self.access_token.take() {
            let result = self
                .client
                .post(self.auth_url("/logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(&token)
                .send()
                .await;
            match result {
                Ok(resp) if !resp.status().is_success() => {
                    warn!(status = %resp.status(), "server-side sign-out failed");
                }
                Err(e) => warn!("server-side sign-out failed: {e}"),
                Ok(_) => {}
            }
        }
        self.events.publish(None);
    }

    /// Session retrieval: validate the held access token and return the
    /// identity it belongs to. Returns `None` when there is no token or the
    /// token is no longer accepted.
    pub async fn current_user(&self) -> Result<Option<Identity>, ClientError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };
        let resp = self
            .client
            .get(self.auth_url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }
        let identity: Identity = parse_response(resp).await?;
        Ok(Some(identity))
    }

    /// Request a password-reset email, carrying the post-reset redirect.
    pub async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), ClientError> {
        let url = format!(
            "{}?redirect_to={}",
            self.auth_url("/recover"),
            urlencoding::encode(redirect_to)
        );
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&RecoverRequest {
                email: email.to_string(),
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }

    // ── Table-style REST ──────────────────────────────────────────────────

    /// `select * from <table> where <col> = <value> … [order by <col> desc]`.
    pub async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        order_desc: Option<&str>,
    ) -> Result<Vec<T>, ClientError> {
        let url = rest_query(&self.base_url, table, filters, order_desc);
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        parse_response(resp).await
    }

    /// Single-row select: the first matching row, or `None`.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Option<T>, ClientError> {
        let mut rows = self.select_rows(table, filters, None).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// Insert one row and return it with server-assigned fields populated.
    pub async fn insert_row<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, ClientError> {
        let url = rest_query(&self.base_url, table, &[], None);
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(row)
            .send()
            .await?;
        let mut rows: Vec<T> = parse_response(resp).await?;
        if rows.is_empty() {
            return Err(ClientError::NotFound);
        }
        Ok(rows.swap_remove(0))
    }

    /// `update <table> set … where id = <id>`, returning the updated row.
    /// `None` means no row matched the id.
    pub async fn update_row<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        changes: &B,
    ) -> Result<Option<T>, ClientError> {
        let url = rest_query(&self.base_url, table, &[("id", id)], None);
        let resp = self
            .client
            .patch(url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(changes)
            .send()
            .await?;
        let mut rows: Vec<T> = parse_response(resp).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// `delete from <table> where id = <id>`. `Ok(false)` means no row
    /// matched the id.
    pub async fn delete_row(&self, table: &str, id: &str) -> Result<bool, ClientError> {
        let url = rest_query(&self.base_url, table, &[("id", id)], None);
        let resp = self
            .client
            .delete(url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = parse_response(resp).await?;
        Ok(!rows.is_empty())
    }
}

/// Build a REST query URL: `select=*`, equality filters, optional descending
/// order. Filter values are percent-encoded.
fn rest_query(
    base_url: &str,
    table: &str,
    filters: &[(&str, &str)],
    order_desc: Option<&str>,
) -> String {
    let mut url = format!("{base_url}/rest/v1/{table}?select=*");
    for (column, value) in filters {
        url.push_str(&format!("&{column}=eq.{}", urlencoding::encode(value)));
    }
    if let Some(column) = order_desc {
        url.push_str(&format!("&order={column}.desc"));
    }
    url
}

/// Parse an HTTP response: the deserialized body on 2xx, otherwise an error
/// carrying the status and the most readable message the body offers.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    if !resp.status().is_success() {
        return Err(error_from_response(resp).await);
    }
    Ok(resp.json().await?)
}

async fn error_from_response(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<AuthErrorBody>(&text)
        .ok()
        .and_then(|body| body.message().map(str::to_string))
        .unwrap_or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });
    ClientError::Backend { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_query_builds_filters_and_order() {
        let url = rest_query(
            "https://abc.backend.dev",
            "tasks",
            &[("userid", "u-1")],
            Some("createdat"),
        );
        assert_eq!(
            url,
            "https://abc.backend.dev/rest/v1/tasks?select=*&userid=eq.u-1&order=createdat.desc"
        );
    }

    #[test]
    fn rest_query_percent_encodes_filter_values() {
        let url = rest_query("http://h", "users", &[("id", "u 1&x=y")], None);
        assert_eq!(url, "http://h/rest/v1/users?select=*&id=eq.u%201%26x%3Dy");
    }

    #[test]
    fn transport_and_server_errors_are_retryable() {
        let server = ClientError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        };
        let client = ClientError::Backend {
            status: StatusCode::BAD_REQUEST,
            message: "bad".to_string(),
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!ClientError::NotFound.is_retryable());
    }
}
