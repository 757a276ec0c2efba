use std::fs;
use std::path::Path;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::ServerConfig;
use crate::error::{MetricsError, Result};

pub const USER_AGENT: &str = "Puppetserver-Metrics/1.0";

/// One read request against `/metrics/v2/read`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub category: String,
    pub name: Option<String>,
    pub kind: Option<String>,
}

impl MetricQuery {
    /// Query an MBean by its `type` property, e.g. `java.lang:type=Threading`
    pub fn by_type(category: &str, kind: &str) -> Self {
        Self {
            category: category.to_string(),
            name: None,
            kind: Some(kind.to_string()),
        }
    }

    /// Query MBeans by `name` pattern, e.g. `puppetserver:name=...memory.*`
    pub fn by_name(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: Some(name.to_string()),
            kind: None,
        }
    }

    pub fn path(&self) -> String {
        let params: Vec<String> = self
            .kind
            .iter()
            .map(|kind| format!("type={}", kind))
            .chain(self.name.iter().map(|name| format!("name={}", name)))
            .collect();

        format!("/metrics/v2/read/{}:{}", self.category, params.join(","))
    }
}

/// Transport used by metric sources to retrieve a decoded document
pub trait Fetch: Send + Sync {
    fn fetch(&self, query: &MetricQuery) -> Result<Value>;
}

/// Envelope fields of a metrics API response
#[derive(Debug, Deserialize)]
struct ResponseHeader {
    #[serde(default)]
    status: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

/// The metrics API wraps failures in a 200 response with its own `status`
pub fn check_document_status(document: &Value) -> Result<()> {
    let header = ResponseHeader::deserialize(document)?;
    match header.status {
        Some(200) | None => Ok(()),
        Some(status) => Err(MetricsError::fetch(format!(
            "metrics API status {}: {}",
            status,
            header.error.as_deref().unwrap_or("no error message")
        ))),
    }
}

/// Blocking HTTPS client authenticating with the agent's certificate.
pub struct MetricsClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl MetricsClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let ca_pem = read_pem(&config.tls.cacert, "CA certificate")?;
        let roots = reqwest::Certificate::from_pem_bundle(&ca_pem).map_err(|e| {
            MetricsError::config(format!(
                "Invalid CA certificate {}: {}",
                config.tls.cacert.display(),
                e
            ))
        })?;

        let mut identity_pem = read_pem(&config.tls.cert, "client certificate")?;
        identity_pem.extend(read_pem(&config.tls.key, "client key")?);
        let identity = reqwest::Identity::from_pem(&identity_pem)
            .map_err(|e| MetricsError::config(format!("Invalid client certificate or key: {}", e)))?;

        let mut builder = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .identity(identity)
            .user_agent(USER_AGENT)
            .timeout(config.timeout);

        for root in roots {
            builder = builder.add_root_certificate(root);
        }

        if !config.use_proxy {
            log::info!("Ignoring proxy environment variables");
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| MetricsError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Fetch for MetricsClient {
    fn fetch(&self, query: &MetricQuery) -> Result<Value> {
        let url = format!("{}{}", self.base_url, query.path());
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(MetricsError::fetch(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        let document: Value = response.json()?;
        check_document_status(&document)?;

        Ok(document)
    }
}

fn read_pem(path: &Path, description: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        MetricsError::config(format!(
            "Failed to read {} {}: {}",
            description,
            path.display(),
            e
        ))
    })
}
