use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hero_core::HeroError;
use hero_types::Action;
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::ClientConfig;

const DEFAULT_REMOTE_MESSAGE: &str = "The server reported an error";

/// Request/response channel to the remote authority.
#[async_trait]
pub trait ActionGateway: Send + Sync {
    /// Sends one action. On success the body is the authority's
    /// `{"success": true, ...}` object.
    async fn call(&self, action: Action, payload: Value) -> Result<Value, HeroError>;
}

#[async_trait]
impl<G: ActionGateway + ?Sized> ActionGateway for Arc<G> {
    async fn call(&self, action: Action, payload: Value) -> Result<Value, HeroError> {
        (**self).call(action, payload).await
    }
}

/// Maps `{"success": false, "message": ..}` to a remote failure and rejects
/// bodies that are not JSON objects.
pub fn unwrap_envelope(action: Action, body: Value) -> Result<Value, HeroError> {
    let Value::Object(fields) = &body else {
        return Err(HeroError::Protocol {
            action,
            message: format!("expected a JSON object, got {body}"),
        });
    };
    if fields.get("success") == Some(&Value::Bool(false)) {
        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(DEFAULT_REMOTE_MESSAGE)
            .to_string();
        return Err(HeroError::Remote { action, message });
    }
    Ok(body)
}

/// Strips a `callback(...)` wrapper if the authority answered JSONP-style.
pub fn strip_jsonp(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }
    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(open), Some(close)) if open < close => trimmed[open + 1..close].trim(),
        _ => trimmed,
    }
}

/// Races a call against a teardown signal.
pub async fn call_cancellable<G: ActionGateway + ?Sized>(
    gateway: &G,
    action: Action,
    payload: Value,
    cancel: &mut watch::Receiver<bool>,
) -> Result<Value, HeroError> {
    if *cancel.borrow() {
        return Err(HeroError::Cancelled { action });
    }

    let torn_down = async {
        if cancel.wait_for(|torn_down| *torn_down).await.is_err() {
            // Sender gone without tearing down: never cancel.
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = gateway.call(action, payload) => result,
        _ = torn_down => {
            tracing::debug!(%action, "Call abandoned on teardown");
            Err(HeroError::Cancelled { action })
        }
    }
}

/// Connectivity check. Never errors.
pub async fn ping<G: ActionGateway + ?Sized>(gateway: &G) -> bool {
    match gateway.call(Action::Ping, Value::Object(Default::default())).await {
        Ok(body) => body.get("success") == Some(&Value::Bool(true)),
        Err(err) => {
            tracing::warn!("Ping failed: {}", err);
            false
        }
    }
}

/// Gateway speaking the authority's query-string protocol over HTTP GET.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    timeout: Duration,
    max_url_length: usize,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration, max_url_length: usize) -> Result<Self, HeroError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HeroError::Config(format!("invalid authority URL '{base_url}': {e}")))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            timeout,
            max_url_length,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, HeroError> {
        Self::new(config.authority_url()?, config.request_timeout, config.max_url_length)
    }

    pub fn request_url(&self, action: Action, payload: &Value, request_id: &str) -> Result<Url, HeroError> {
        let payload = payload.to_string();
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("action", action.as_str())
            .append_pair("payload", &payload)
            .append_pair("v", request_id);

        let length = url.as_str().len();
        if length > self.max_url_length {
            return Err(HeroError::PayloadTooLarge {
                action,
                length,
                limit: self.max_url_length,
            });
        }
        Ok(url)
    }

    async fn exchange(&self, action: Action, url: Url) -> Result<Value, HeroError> {
        let transport = |message: String| HeroError::Transport { action, message };

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("Request for {} failed: {:?}", action, e);
            transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Authority returned status {} for {}", status, action);
            return Err(transport(format!("HTTP status {status}")));
        }

        let text = response.text().await.map_err(|e| transport(e.to_string()))?;
        serde_json::from_str(strip_jsonp(&text)).map_err(|e| HeroError::Protocol {
            action,
            message: format!("response is not JSON: {e}"),
        })
    }
}

#[async_trait]
impl ActionGateway for HttpGateway {
    async fn call(&self, action: Action, payload: Value) -> Result<Value, HeroError> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.request_url(action, &payload, &request_id)?;
        tracing::debug!(%action, %request_id, "Calling authority");

        let body = match tokio::time::timeout(self.timeout, self.exchange(action, url)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(%action, %request_id, "No answer within {:?}", self.timeout);
                return Err(HeroError::Timeout {
                    action,
                    after: self.timeout,
                });
            }
        };

        let result = unwrap_envelope(action, body);
        match &result {
            Ok(_) => tracing::debug!(%action, %request_id, "Authority answered"),
            Err(err) => tracing::warn!(%action, %request_id, "Authority refused: {}", err),
        }
        result
    }
}
