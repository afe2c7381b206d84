use crate::capability::{Capability, CapabilityDefinition, Namespace};
use crate::error::{CapctlError, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

/// Blocking client for the capability endpoints of the platform API.
/// Every operation is single-shot and fail-explicit; there is no retry.
pub struct CapabilitiesClient {
    base_url: String,
    token: String,
    http: Client,
}

impl CapabilitiesClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: Client::new(),
        }
    }

    /// Submit a new capability definition and return the created capability.
    pub fn create(&self, definition: &CapabilityDefinition) -> Result<Capability> {
        let url = format!("{}/capabilities", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(definition)
            .send()?;
        parse(response)
    }

    /// List the capability namespaces available to the account.
    pub fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        let url = format!("{}/capabilities/namespaces", self.base_url);
        let response = self.http.get(&url).bearer_auth(&self.token).send()?;
        parse(response)
    }
}

fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        return Err(CapctlError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json()?)
}
