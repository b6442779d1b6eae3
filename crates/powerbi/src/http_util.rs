//! Shared HTTP plumbing for Power BI calls.
//!
//! Centralizes the send → status-check → decode sequence.

use pbiembed_types::{EmbedError, error::Result};
use rquest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Thin wrapper around the HTTP client used for every Power BI request.
#[derive(Clone)]
pub struct PowerBiHttp {
    http: Client,
}

impl PowerBiHttp {
    /// Creates a new helper wrapping the given HTTP client.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Returns a reference to the inner HTTP client for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.http
    }

    /// Sends a request and checks for success status.
    ///
    /// On non-2xx responses, reads the body text and returns
    /// [`EmbedError::Upstream`].
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::Upstream` on non-success HTTP status codes,
    /// or a transport error if the request fails to send.
    pub async fn send(&self, builder: RequestBuilder) -> Result<rquest::Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(EmbedError::Upstream {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    /// Sends a request and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::Upstream` on non-success status, or a
    /// transport/parse error.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let text = self.send(builder).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends a request and returns the raw body text.
    ///
    /// # Errors
    ///
    /// Returns `EmbedError::Upstream` on non-success status, or a transport error.
    pub async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        Ok(self.send(builder).await?.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powerbi_http_clone() {
        let http = PowerBiHttp::new(Client::new());
        let _http2 = http.clone();
    }
}
