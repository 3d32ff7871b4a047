//! Endpoint probes.
//!
//! A [`ServiceProbe`] describes one HTTP check; [`HttpProber`] executes it and
//! classifies the answer into a [`ProbeOutcome`]. Probing never fails: a
//! transport error is itself an outcome.

use crate::error::ManagerError;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            ProbeMethod::Get => "GET",
            ProbeMethod::Post => "POST",
            ProbeMethod::Delete => "DELETE",
        };
        f.write_str(method)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceProbe {
    pub name: String,
    pub url: String,
    pub method: ProbeMethod,
    pub body: Option<Value>,
    pub params: Vec<(String, String)>,
}

impl ServiceProbe {
    fn new(name: &str, url: String, method: ProbeMethod) -> Self {
        Self {
            name: name.to_string(),
            url,
            method,
            body: None,
            params: Vec::new(),
        }
    }

    pub fn get(name: &str, url: impl Into<String>) -> Self {
        Self::new(name, url.into(), ProbeMethod::Get)
    }

    pub fn post(name: &str, url: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(name, url.into(), ProbeMethod::Post)
        }
    }

    pub fn delete(name: &str, url: impl Into<String>) -> Self {
        Self::new(name, url.into(), ProbeMethod::Delete)
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }
}

/// The shopping-list endpoints, in the order they are checked.
pub fn default_probes(base_url: &str) -> Vec<ServiceProbe> {
    let base = base_url.trim_end_matches('/');
    let url = |path: &str| format!("{}{}", base, path);

    vec![
        ServiceProbe::get("View List", url("/view-list")),
        ServiceProbe::post(
            "Add Item",
            url("/add-item"),
            json!({ "_id": "123", "name": "Test Item", "quantity": 5 }),
        ),
        ServiceProbe::delete("Delete Item", url("/delete-item")).with_param("id", "123"),
        ServiceProbe::delete("Clear List", url("/clear-list")),
        ServiceProbe::get("Count Items", url("/count-items")),
        ServiceProbe::get("Generate ID", url("/generate-id")),
        ServiceProbe::get("Search Item", url("/search-item")).with_param("keyword", "test"),
        ServiceProbe::get("Search Online", url("/search-online")).with_param("query", "laptop"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Success,
    Created,
    ClientError(u16),
    NotFound,
    ServerError(u16),
    Unexpected(u16),
    Unreachable,
}

impl ProbeStatus {
    pub fn classify(status: u16) -> Self {
        match status {
            200 => ProbeStatus::Success,
            201 => ProbeStatus::Created,
            404 => ProbeStatus::NotFound,
            400..=499 => ProbeStatus::ClientError(status),
            500..=599 => ProbeStatus::ServerError(status),
            other => ProbeStatus::Unexpected(other),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeStatus::Success | ProbeStatus::Created)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub name: String,
    pub latency: Duration,
    pub status: ProbeStatus,
    pub message: Option<String>,
}

impl ProbeOutcome {
    fn from_response(name: &str, latency: Duration, status: u16, body: &str) -> Self {
        let status = ProbeStatus::classify(status);
        let message = match status {
            ProbeStatus::Success | ProbeStatus::Created => None,
            ProbeStatus::NotFound | ProbeStatus::ClientError(400) => Some(json_message(body)),
            _ => Some(body.to_string()),
        };

        Self {
            name: name.to_string(),
            latency,
            status,
            message,
        }
    }

    /// Emit the outcome at its severity: healthy is info, unreachable is
    /// error, any other answer is a warning.
    pub fn log(&self) {
        let name = &self.name;
        let latency_ms = self.latency.as_millis() as u64;
        let message = self.message.as_deref().unwrap_or_default();

        match self.status {
            ProbeStatus::Success => tracing::info!(
                probe = %name,
                latency_ms,
                "{} is running successfully (response time: {:.2}s)",
                name,
                self.latency.as_secs_f64()
            ),
            ProbeStatus::Created => {
                tracing::info!(probe = %name, latency_ms, "{} created successfully", name)
            }
            ProbeStatus::ClientError(400) => tracing::warn!(
                probe = %name,
                status = 400,
                "{} returned status 400 (Bad Request): {}",
                name,
                message
            ),
            ProbeStatus::NotFound => tracing::warn!(
                probe = %name,
                status = 404,
                "{} returned status 404 (Not Found): {}",
                name,
                message
            ),
            ProbeStatus::ClientError(code)
            | ProbeStatus::ServerError(code)
            | ProbeStatus::Unexpected(code) => tracing::warn!(
                probe = %name,
                status = code,
                "{} returned status {}: {}",
                name,
                code,
                message
            ),
            ProbeStatus::Unreachable => tracing::error!(
                probe = %name,
                error = %message,
                "{} is NOT reachable! Check the service.",
                name
            ),
        }
    }
}

/// `message` field of a JSON error body.
fn json_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, ManagerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn probe(&self, probe: &ServiceProbe) -> ProbeOutcome {
        let mut request = match probe.method {
            ProbeMethod::Get => self.client.get(&probe.url),
            ProbeMethod::Post => self.client.post(&probe.url),
            ProbeMethod::Delete => self.client.delete(&probe.url),
        };
        if !probe.params.is_empty() {
            request = request.query(&probe.params);
        }
        if let Some(body) = &probe.body {
            request = request.json(body);
        }

        tracing::debug!(probe = %probe.name, method = %probe.method, url = %probe.url, "Probing");

        let start = Instant::now();
        match request.send().await {
            Ok(response) => {
                let latency = start.elapsed();
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => ProbeOutcome::from_response(&probe.name, latency, status, &body),
                    Err(e) => {
                        tracing::warn!(
                            probe = %probe.name,
                            status,
                            error = %e,
                            "Failed to read probe response body"
                        );
                        ProbeOutcome {
                            name: probe.name.clone(),
                            latency,
                            status: ProbeStatus::classify(status),
                            message: Some(format!("failed to read response body: {}", e)),
                        }
                    }
                }
            }
            Err(e) => ProbeOutcome {
                name: probe.name.clone(),
                latency: start.elapsed(),
                status: ProbeStatus::Unreachable,
                message: Some(e.to_string()),
            },
        }
    }
}
