//! Practicum adapter (homework status API).
//!
//! Implements the `hwb-core` HomeworkSource port over HTTP.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde_json::Value;
use tracing::debug;

use hwb_core::{
    config::Config, domain::Watermark, errors::Error, ports::HomeworkSource, Result,
};

const EXCERPT_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct PracticumClient {
    endpoint: String,
    api_token: String,
    http: reqwest::Client,
}

impl PracticumClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .connect_timeout(cfg.connect_timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            endpoint: cfg.endpoint.clone(),
            api_token: cfg.credentials.api_token.clone(),
            http,
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_homeworks(&self, from: Watermark) -> Result<Value> {
        debug!(endpoint = %self.endpoint, from_date = from.0, "requesting homework statuses");

        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.api_token))
            .query(&[("from_date", from.0)])
            .send()
            .await
            .map_err(|e| Error::Transport {
                endpoint: self.endpoint.clone(),
                cause: e.without_url().to_string(),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Access {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body = resp.text().await.map_err(|e| Error::Transport {
            endpoint: self.endpoint.clone(),
            cause: e.without_url().to_string(),
        })?;

        decode_payload(&self.endpoint, &body)
    }
}

/// Parse a 200 body and reject server-side error documents.
pub fn decode_payload(endpoint: &str, body: &str) -> Result<Value> {
    let doc: Value = serde_json::from_str(body).map_err(|e| Error::MalformedPayload {
        excerpt: body.chars().take(EXCERPT_CHARS).collect(),
        cause: e.to_string(),
    })?;

    if let Some(obj) = doc.as_object() {
        let found: Vec<String> = ["error", "code"]
            .iter()
            .filter_map(|key| obj.get(*key).map(|v| format!("{key} - {}", render(v))))
            .collect();
        if !found.is_empty() {
            return Err(Error::ServerRejection {
                endpoint: endpoint.to_string(),
                details: found.join(", "),
            });
        }
    }

    Ok(doc)
}

fn render(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
