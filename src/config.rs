use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::platform::DirectoryPlatform;
use crate::transport::{ResponseMode, UploadTransport};
use crate::{
    Result, UploadError, DEFAULT_API_PREFIX, FALLBACK_HOST, LEGACY_API_PORT,
};

/// Where the API lives relative to the page origin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiMount {
    /// Same host and port as the page, below a path prefix (reverse proxy).
    Prefix(String),
    /// Same host as the page, on a dedicated port.
    Port(u16),
}

impl Default for ApiMount {
    fn default() -> Self {
        Self::Prefix(DEFAULT_API_PREFIX.to_owned())
    }
}

impl ApiMount {
    pub fn legacy() -> Self {
        Self::Port(LEGACY_API_PORT)
    }
}

/// Inputs for resolving the API base URL.
///
/// Precedence: explicit override, then the page origin combined with the
/// API mount, then a localhost fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BaseUrlConfig {
    pub override_url: Option<Url>,
    pub page_origin: Option<Url>,
    pub api_mount: ApiMount,
}

impl BaseUrlConfig {
    pub fn resolve(&self) -> Result<Url> {
        if let Some(url) = &self.override_url {
            trace!("Using explicit base URL {}", url);
            return Ok(url.clone());
        }

        let base = match &self.page_origin {
            Some(origin) => {
                let host = origin
                    .host_str()
                    .ok_or(UploadError::Url(url::ParseError::EmptyHost))?;
                let authority = match (&self.api_mount, origin.port()) {
                    (ApiMount::Port(port), _) => format!("{host}:{port}"),
                    (ApiMount::Prefix(_), Some(port)) => {
                        format!("{host}:{port}")
                    }
                    (ApiMount::Prefix(_), None) => host.to_owned(),
                };
                format!("{}://{}{}", origin.scheme(), authority, self.path())
            }
            None => match &self.api_mount {
                ApiMount::Port(port) => {
                    format!("http://{FALLBACK_HOST}:{port}")
                }
                ApiMount::Prefix(_) => {
                    format!("http://{FALLBACK_HOST}{}", self.path())
                }
            },
        };

        debug!("Resolved base URL {}", base);
        Ok(Url::parse(&base)?)
    }

    /// The API prefix, always starting with `/`.
    fn path(&self) -> String {
        match &self.api_mount {
            ApiMount::Prefix(prefix) if prefix.starts_with('/') => {
                prefix.clone()
            }
            ApiMount::Prefix(prefix) => format!("/{prefix}"),
            ApiMount::Port(_) => String::new(),
        }
    }
}

/// Client configuration, usually read from a JSON file. Every field is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<Url>,
    pub page_origin: Option<Url>,
    pub api_mount: ApiMount,
    pub timeout_secs: Option<u64>,
    pub out_dir: Option<PathBuf>,
    pub response_mode: ResponseMode,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        trace!("Loading config from {}", path.display());

        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn base_url_config(&self) -> BaseUrlConfig {
        BaseUrlConfig {
            override_url: self.base_url.clone(),
            page_origin: self.page_origin.clone(),
            api_mount: self.api_mount.clone(),
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn platform(&self) -> DirectoryPlatform {
        DirectoryPlatform::new(self.base_url_config(), self.out_dir())
    }

    pub fn transport(&self) -> Result<UploadTransport<DirectoryPlatform>> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(UploadTransport::with_client(client, self.platform())
            .response_mode(self.response_mode))
    }
}
