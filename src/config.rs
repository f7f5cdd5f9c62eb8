//! Endpoint and base-URL configuration for the procedure transport.
//!
//! Base URL detection follows the hosting environment: Vercel, Railway and
//! Render publish their public URL through environment variables; anything
//! else is assumed to be local development on `PORT` (default 3000).

use std::collections::HashMap;
use std::env;

/// Path prefix under which procedures are served.
pub const DEFAULT_ENDPOINT: &str = "/api/trpc";

/// Port used for local development when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Client-side transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Overrides detection when set.
    pub base_url: Option<String>,
    pub default_port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            base_url: None,
            default_port: DEFAULT_PORT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    /// Full URL of the procedure endpoint, e.g. `http://localhost:3000/api/trpc`.
    pub fn url(&self) -> String {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => base_url_from(&process_env(), self.default_port),
        };
        format!("{}{}", base.trim_end_matches('/'), self.endpoint)
    }
}

/// Server-side transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub endpoint: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Defaults, with the port taken from `PORT` when it parses.
    pub fn from_env() -> Self {
        Self::from_vars(&process_env())
    }

    fn from_vars(vars: &HashMap<String, String>) -> Self {
        let port = vars
            .get("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            port,
            ..Self::default()
        }
    }

    /// `host:port`, ready for a listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn process_env() -> HashMap<String, String> {
    env::vars().collect()
}

/// Detect the public base URL from environment variables.
pub fn base_url_from(vars: &HashMap<String, String>, default_port: u16) -> String {
    if let Some(host) = vars.get("VERCEL_URL") {
        return format!("https://{}", host);
    }
    if let Some(host) = vars.get("RAILWAY_STATIC_URL") {
        return format!("https://{}", host);
    }
    if let Some(url) = vars.get("RENDER_EXTERNAL_URL") {
        return url.clone();
    }
    let port = vars
        .get("PORT")
        .cloned()
        .unwrap_or_else(|| default_port.to_string());
    format!("http://localhost:{}", port)
}
