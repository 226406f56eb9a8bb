//! Source adapter error types.

/// Errors from a mobility source adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// HTTP request failed (network error, client timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Upstream answered with an error status or error object
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl AdapterError {
    /// Build a `Json` error, keeping a short excerpt of the offending body.
    pub(crate) fn json(err: impl std::fmt::Display, body: &str) -> Self {
        AdapterError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

/// Map a non-success response to `AdapterError::Api`, otherwise read the body.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, AdapterError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AdapterError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response.text().await?)
}
