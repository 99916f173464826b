//! REST client for fixture setup and server configuration
//!
//! One client holds one authenticated identity at a time (the session
//! token captured from the last login), mirroring how the suite switches
//! between admin and regular users.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Method;
use serde_json::{json, Value};

use crate::common::config::{ServerConfig, Timeouts};
use crate::common::{Error, Result};

use super::types::{ApiError, Channel, Team, User};

/// Password assigned to every fixture user
const FIXTURE_PASSWORD: &str = "SuitePass-123!";

/// Session-token response header
const TOKEN_HEADER: &str = "Token";

static SUFFIX_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique lowercase suffix for fixture names, so repeated runs against the
/// same server never collide.
fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64 + d.as_secs().wrapping_mul(1_000_000_000))
        .unwrap_or(0);
    let count = SUFFIX_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}{:x}", nanos & 0xffff_ffff, count)
}

/// Client for the chat server's REST API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given server base URL
    pub fn new(base_url: &str, timeouts: &Timeouts) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Session token of the currently logged-in identity, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    /// Issue a request and fail on any non-2xx status, carrying the
    /// server's error message.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let message = resp
            .json::<ApiError>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| "<no error body>".to_string());
        Err(Error::server_request(path, status, &message))
    }

    /// Check that the server is up
    pub async fn ping(&self) -> Result<()> {
        let url = self.url("/system/ping");
        let resp = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                Error::ServerUnreachable {
                    url: self.base_url.clone(),
                    source: e,
                }
            } else {
                Error::Http(e)
            }
        })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::server_request(
                "/system/ping",
                resp.status().as_u16(),
                "server is not healthy",
            ))
        }
    }

    /// Log in, replacing the client's identity with this user's session
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User> {
        let body = json!({ "login_id": username, "password": password });
        let resp = self
            .request(Method::POST, "/users/login", Some(&body))
            .await?;

        let token = resp
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::Setup("login response carried no session token".to_string()))?;

        let mut user: User = resp.json().await?;
        user.password = password.to_string();
        self.token = Some(token);

        tracing::debug!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Log in with the admin account from the server config
    pub async fn admin_login(&mut self, server: &ServerConfig) -> Result<User> {
        self.login(&server.admin_username, &server.admin_password)
            .await
    }

    /// Create a fresh user with generated credentials
    pub async fn create_user(&self) -> Result<User> {
        let suffix = unique_suffix();
        let username = format!("user-{suffix}");
        let body = json!({
            "username": username,
            "email": format!("{username}@suite.test"),
            "password": FIXTURE_PASSWORD,
        });

        let resp = self.request(Method::POST, "/users", Some(&body)).await?;
        let mut user: User = resp.json().await?;
        user.password = FIXTURE_PASSWORD.to_string();

        tracing::debug!(username = %user.username, "created user");
        Ok(user)
    }

    /// Create an open team
    pub async fn create_team(&self, name: &str, display_name: &str) -> Result<Team> {
        let body = json!({ "name": name, "display_name": display_name, "type": "O" });
        let resp = self.request(Method::POST, "/teams", Some(&body)).await?;
        let team: Team = resp.json().await?;

        tracing::debug!(team = %team.name, "created team");
        Ok(team)
    }

    /// Add a user to a team
    pub async fn add_user_to_team(&self, team_id: &str, user_id: &str) -> Result<()> {
        let body = json!({ "team_id": team_id, "user_id": user_id });
        self.request(
            Method::POST,
            &format!("/teams/{team_id}/members"),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    /// Create a public channel in a team
    pub async fn create_channel(
        &self,
        team_id: &str,
        name: &str,
        display_name: &str,
    ) -> Result<Channel> {
        let body = json!({
            "team_id": team_id,
            "name": name,
            "display_name": display_name,
            "type": "O",
        });
        let resp = self.request(Method::POST, "/channels", Some(&body)).await?;
        let channel: Channel = resp.json().await?;

        tracing::debug!(channel = %channel.name, "created channel");
        Ok(channel)
    }

    /// Patch the server-wide archived-channels visibility flag
    ///
    /// Requires an admin session.
    pub async fn update_experimental_view_archived(&self, enabled: bool) -> Result<()> {
        let body = json!({
            "TeamSettings": { "ExperimentalViewArchivedChannels": enabled }
        });
        self.request(Method::PUT, "/config/patch", Some(&body))
            .await?;

        tracing::info!(enabled, "updated archived-channels visibility flag");
        Ok(())
    }

    /// Create the standard team + primary-user bundle
    ///
    /// Requires an admin session: creates a uniquely-named team and user,
    /// and adds the user to the team.
    pub async fn init_setup(&self) -> Result<(Team, User)> {
        let suffix = unique_suffix();
        let team = self
            .create_team(&format!("team-{suffix}"), &format!("Team {suffix}"))
            .await?;
        let user = self.create_user().await?;
        self.add_user_to_team(&team.id, &user.id).await?;
        Ok((team, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:8065/", &Timeouts::default()).unwrap();
        assert_eq!(
            client.url("/users/login"),
            "http://localhost:8065/api/v4/users/login"
        );
    }

    #[test]
    fn test_unique_suffixes_differ() {
        let a = unique_suffix();
        let b = unique_suffix();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_client_has_no_identity() {
        let client = ApiClient::new("http://localhost:8065", &Timeouts::default()).unwrap();
        assert!(client.token().is_none());
    }
}
