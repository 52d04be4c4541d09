//! Credential validation against the lightweight models endpoint.

use reqwest::Client;

use crate::core::http::{MODELS_PATH, authorized_get, endpoint};

/// Resolve the credential to use for a request.
///
/// The trimmed explicit value wins; a blank explicit value falls back to the
/// configured default. Returns `None` when neither is usable.
#[must_use]
pub fn resolve_credential(explicit: &str, default: Option<&str>) -> Option<String> {
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        return Some(explicit.to_string());
    }
    default
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// Checks whether the API accepts a credential.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    client: Client,
    base_url: String,
    default_credential: Option<String>,
}

impl CredentialValidator {
    #[must_use]
    pub const fn new(
        client: Client,
        base_url: String,
        default_credential: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            default_credential,
        }
    }

    /// Returns `true` only if the API answers the models endpoint with 2xx.
    ///
    /// Rejections and transport failures both yield `false`; there are no
    /// retries. A blank credential with no configured default never touches
    /// the network.
    pub async fn validate(&self, credential: &str) -> bool {
        let Some(key) = resolve_credential(credential, self.default_credential.as_deref()) else {
            tracing::debug!("No credential to validate");
            return false;
        };

        let url = endpoint(&self.base_url, MODELS_PATH);
        match authorized_get(&self.client, &url, &key).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(status = status.as_u16(), "Credential validation response");
                status.is_success()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Credential validation request failed");
                false
            }
        }
    }
}
