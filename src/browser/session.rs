//! WebDriver session client
//!
//! Talks to an external WebDriver endpoint (chromedriver or similar) over
//! its REST protocol. Element waits poll with a fixed budget; exceeding it
//! is an `Error::ElementTimeout`, reported distinctly from assertion
//! mismatches so a slow page is never confused with a wrong one.

use std::time::{Duration, Instant};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};

use super::types::{NewSessionValue, StatusValue, WdError, WdValue, NO_SUCH_ELEMENT};

/// Handle to an element inside the session's current page
#[derive(Debug, Clone)]
pub struct Element {
    pub id: String,
}

/// One browser session against a WebDriver endpoint
pub struct Session {
    http: reqwest::Client,
    base: String,
    session_id: String,
    timeouts: Timeouts,
}

/// Probe a WebDriver endpoint's readiness (`GET /status`)
pub async fn webdriver_ready(webdriver_url: &str, timeouts: &Timeouts) -> Result<bool> {
    let http = build_http(timeouts)?;
    let url = format!("{}/status", webdriver_url.trim_end_matches('/'));
    let resp = http.get(&url).send().await.map_err(|e| {
        if e.is_connect() {
            Error::WebDriverUnreachable {
                url: webdriver_url.to_string(),
                source: e,
            }
        } else {
            Error::Http(e)
        }
    })?;
    let body: WdValue<StatusValue> = resp.json().await?;
    Ok(body.value.ready)
}

fn build_http(timeouts: &Timeouts) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .build()?)
}

impl Session {
    /// Open a new browser session
    pub async fn start(webdriver_url: &str, timeouts: &Timeouts) -> Result<Self> {
        let http = build_http(timeouts)?;
        let base = webdriver_url.trim_end_matches('/').to_string();

        let caps = json!({
            "capabilities": { "alwaysMatch": { "browserName": "chrome" } }
        });

        let url = format!("{base}/session");
        let value: NewSessionValue =
            send(&http, Method::POST, &url, Some(caps), "new session")
                .await
                .map_err(|e| match e {
                    Error::Http(err) if err.is_connect() => Error::WebDriverUnreachable {
                        url: base.clone(),
                        source: err,
                    },
                    other => other,
                })?;

        tracing::debug!(session_id = %value.session_id, "browser session started");

        Ok(Self {
            http,
            base,
            session_id: value.session_id,
            timeouts: timeouts.clone(),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        command: &str,
    ) -> Result<T> {
        let url = format!("{}/session/{}{}", self.base, self.session_id, path);
        send(&self.http, method, &url, body, command).await
    }

    /// Navigate to a URL
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "navigate");
        self.execute::<Value>(Method::POST, "/url", Some(json!({ "url": url })), "navigate")
            .await?;
        Ok(())
    }

    /// Current URL of the page
    pub async fn current_url(&self) -> Result<String> {
        self.execute(Method::GET, "/url", None, "current url").await
    }

    /// Find the first element matching a CSS selector
    pub async fn find(&self, css: &str) -> Result<Element> {
        let body = json!({ "using": "css selector", "value": css });
        let element: super::types::ElementRef = self
            .execute(Method::POST, "/element", Some(body), css)
            .await?;
        Ok(Element { id: element.id })
    }

    /// Find every element matching a CSS selector (empty when none match)
    pub async fn find_all(&self, css: &str) -> Result<Vec<Element>> {
        let body = json!({ "using": "css selector", "value": css });
        let elements: Vec<super::types::ElementRef> = self
            .execute(Method::POST, "/elements", Some(body), css)
            .await?;
        Ok(elements
            .into_iter()
            .map(|e| Element { id: e.id })
            .collect())
    }

    /// Single non-waiting probe, for negative assertions
    ///
    /// The `no such element` wire error is data here, not a failure.
    pub async fn exists(&self, css: &str) -> Result<bool> {
        match self.find(css).await {
            Ok(_) => Ok(true),
            Err(Error::NoSuchElement(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Click an element
    pub async fn click(&self, element: &Element) -> Result<()> {
        self.execute::<Value>(
            Method::POST,
            &format!("/element/{}/click", element.id),
            Some(json!({})),
            "click",
        )
        .await?;
        Ok(())
    }

    /// Type text into an element
    pub async fn send_keys(&self, element: &Element, text: &str) -> Result<()> {
        self.execute::<Value>(
            Method::POST,
            &format!("/element/{}/value", element.id),
            Some(json!({ "text": text })),
            "send keys",
        )
        .await?;
        Ok(())
    }

    /// Clear a text input
    pub async fn clear(&self, element: &Element) -> Result<()> {
        self.execute::<Value>(
            Method::POST,
            &format!("/element/{}/clear", element.id),
            Some(json!({})),
            "clear",
        )
        .await?;
        Ok(())
    }

    /// Visible text of an element
    pub async fn text(&self, element: &Element) -> Result<String> {
        self.execute(
            Method::GET,
            &format!("/element/{}/text", element.id),
            None,
            "element text",
        )
        .await
    }

    /// Whether an element is rendered visible
    pub async fn is_displayed(&self, element: &Element) -> Result<bool> {
        self.execute(
            Method::GET,
            &format!("/element/{}/displayed", element.id),
            None,
            "element displayed",
        )
        .await
    }

    /// Add a cookie on the current page's domain
    pub async fn add_cookie(&self, name: &str, value: &str) -> Result<()> {
        let body = json!({ "cookie": { "name": name, "value": value, "path": "/" } });
        self.execute::<Value>(Method::POST, "/cookie", Some(body), "add cookie")
            .await?;
        Ok(())
    }

    /// Delete every cookie, dropping the browser's current identity
    pub async fn delete_cookies(&self) -> Result<()> {
        self.execute::<Value>(Method::DELETE, "/cookie", None, "delete cookies")
            .await?;
        Ok(())
    }

    /// End the session
    pub async fn quit(self) -> Result<()> {
        let url = format!("{}/session/{}", self.base, self.session_id);
        send::<Value>(&self.http, Method::DELETE, &url, None, "delete session").await?;
        Ok(())
    }

    // === Waits (fixed budget, no retry beyond the poll loop) ===

    fn deadline(&self) -> Instant {
        Instant::now() + Duration::from_secs(self.timeouts.element_wait_secs)
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timeouts.poll_interval_ms)
    }

    fn timeout(&self, selector: &str, condition: &str) -> Error {
        Error::ElementTimeout {
            selector: selector.to_string(),
            condition: condition.to_string(),
            secs: self.timeouts.element_wait_secs,
        }
    }

    /// Wait for an element to appear
    pub async fn wait_for(&self, css: &str) -> Result<Element> {
        let deadline = self.deadline();
        loop {
            match self.find(css).await {
                Ok(element) => return Ok(element),
                Err(Error::NoSuchElement(_)) => {}
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(self.timeout(css, "appear"));
            }
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    /// Wait for an element to leave the DOM
    pub async fn wait_gone(&self, css: &str) -> Result<()> {
        let deadline = self.deadline();
        loop {
            match self.find(css).await {
                Ok(_) => {}
                Err(Error::NoSuchElement(_)) => return Ok(()),
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(self.timeout(css, "disappear"));
            }
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    /// Wait for an element whose text contains the given needle
    pub async fn wait_for_text(&self, css: &str, needle: &str) -> Result<Element> {
        let deadline = self.deadline();
        loop {
            match self.find(css).await {
                Ok(element) => {
                    let text = self.text(&element).await?;
                    if text.contains(needle) {
                        return Ok(element);
                    }
                }
                Err(Error::NoSuchElement(_)) => {}
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(self.timeout(css, &format!("contain text '{needle}'")));
            }
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    /// Wait for the current URL to contain the given needle
    pub async fn wait_url_contains(&self, needle: &str) -> Result<()> {
        let deadline = self.deadline();
        loop {
            let url = self.current_url().await?;
            if url.contains(needle) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(self.timeout(needle, "appear in the current URL"));
            }
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    /// Fixed settle pause after typing, letting filtered results update
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(self.timeouts.settle_ms)).await;
    }
}

/// Central request helper shared by session start and element commands
///
/// Non-2xx responses carry a `{"value": {"error", "message"}}` body; the
/// `no such element` error is surfaced as its own variant so callers can
/// treat absence as data.
async fn send<T: DeserializeOwned>(
    http: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<Value>,
    command: &str,
) -> Result<T> {
    let mut req = http.request(method, url);
    if let Some(body) = body {
        req = req.json(&body);
    }

    let resp = req.send().await?;
    if resp.status().is_success() {
        let body: WdValue<T> = resp.json().await?;
        return Ok(body.value);
    }

    let wire: WdValue<WdError> = resp.json().await.map_err(|_| Error::WebDriver {
        command: command.to_string(),
        message: "malformed error response".to_string(),
    })?;

    if wire.value.error == NO_SUCH_ELEMENT {
        Err(Error::NoSuchElement(command.to_string()))
    } else {
        Err(Error::WebDriver {
            command: command.to_string(),
            message: format!("{}: {}", wire.value.error, wire.value.message),
        })
    }
}
