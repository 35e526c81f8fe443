use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;

/// Default remote listing endpoint.
pub const DEFAULT_API_BASE: &str = "https://fakestoreapi.com/products";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("{op} request failed: {source}")]
    Request {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op} request returned status {status}")]
    Status { op: &'static str, status: u16 },

    #[error("failed to decode listing response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },

    #[error("remote mirroring is disabled")]
    Disabled,
}

// One item of the remote listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoteProduct {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

impl RemoteProduct {
    /// Maps a remote item into the local record shape, preserving the
    /// remote identifier.
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.title,
            category: self.category,
            price: self.price,
            description: self.description,
            image: self.image,
        }
    }
}

/// Mutation payload sent on POST and PUT. The response is ignored either
/// way; the shape only has to match what the demo API accepts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RemotePayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub category: String,
}

/// The remote collaborator seam. Every call is consumed best-effort: the
/// caller logs failures through [`log_best_effort`] and carries on; nothing
/// here ever feeds back into local state.
#[async_trait]
pub trait RemoteMirror {
    async fn fetch_listing(&self, limit: usize) -> Result<Vec<RemoteProduct>, RemoteError>;

    async fn create(&self, payload: &RemotePayload) -> Result<(), RemoteError>;

    async fn update(&self, id: u64, payload: &RemotePayload) -> Result<(), RemoteError>;

    async fn delete(&self, id: u64) -> Result<(), RemoteError>;
}

#[derive(Clone, Debug)]
pub struct RemoteApi {
    client: reqwest::Client,
    base: String,
}

impl RemoteApi {
    pub fn new(base: &str, timeout_seconds: u64) -> Result<Self, RemoteError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "shopkeeper/",
                env!("CARGO_PKG_VERSION")
            )),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| RemoteError::ClientBuild { source: e })?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/{}", self.base, id)
    }

    fn check(op: &'static str, response: &reqwest::Response) -> Result<(), RemoteError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                op,
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl RemoteMirror for RemoteApi {
    async fn fetch_listing(&self, limit: usize) -> Result<Vec<RemoteProduct>, RemoteError> {
        let response = self
            .client
            .get(self.base.as_str())
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| RemoteError::Request {
                op: "listing",
                source: e,
            })?;
        Self::check("listing", &response)?;
        response
            .json::<Vec<RemoteProduct>>()
            .await
            .map_err(|e| RemoteError::Decode { source: e })
    }

    async fn create(&self, payload: &RemotePayload) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.base.as_str())
            .json(payload)
            .send()
            .await
            .map_err(|e| RemoteError::Request {
                op: "create",
                source: e,
            })?;
        Self::check("create", &response)
    }

    async fn update(&self, id: u64, payload: &RemotePayload) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(payload)
            .send()
            .await
            .map_err(|e| RemoteError::Request {
                op: "update",
                source: e,
            })?;
        Self::check("update", &response)
    }

    async fn delete(&self, id: u64) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|e| RemoteError::Request {
                op: "delete",
                source: e,
            })?;
        Self::check("delete", &response)
    }
}

/// Mirror used when remote traffic is suppressed. Every call reports
/// [`RemoteError::Disabled`], which [`log_best_effort`] swallows silently.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineMirror;

#[async_trait]
impl RemoteMirror for OfflineMirror {
    async fn fetch_listing(&self, _limit: usize) -> Result<Vec<RemoteProduct>, RemoteError> {
        Err(RemoteError::Disabled)
    }

    async fn create(&self, _payload: &RemotePayload) -> Result<(), RemoteError> {
        Err(RemoteError::Disabled)
    }

    async fn update(&self, _id: u64, _payload: &RemotePayload) -> Result<(), RemoteError> {
        Err(RemoteError::Disabled)
    }

    async fn delete(&self, _id: u64) -> Result<(), RemoteError> {
        Err(RemoteError::Disabled)
    }
}

/// Fire-and-forget policy in one place: failures are logged and dropped,
/// never propagated, never retried.
pub fn log_best_effort(op: &str, result: Result<(), RemoteError>) {
    match result {
        Ok(()) => {}
        Err(RemoteError::Disabled) => {}
        Err(e) => crate::app::warn_line(&format!("remote {op} failed: {e} (ignored)")),
    }
}
