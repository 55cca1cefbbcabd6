/*
 * Responsibility
 * - What can go wrong while talking to the identity provider
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{endpoint}: request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint}: unexpected status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{endpoint}: malformed response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("http client setup failed: {0}")]
    Setup(#[source] reqwest::Error),
}
