#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid upstream url {url}: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },
    #[error("invalid path parameter: {0:?}")]
    InvalidPathParam(String),
    #[error("invalid page parameter: {0:?}")]
    InvalidPageParam(String),
    #[error("request body is not valid JSON: {0}")]
    InvalidJsonBody(serde_json::Error),
    #[error("failed to encode request body: {0}")]
    BodyEncoding(serde_json::Error),
    #[error("failed to reach upstream: {0}")]
    Transport(reqwest::Error),
    #[error("failed to read upstream response body: {0}")]
    UpstreamBody(reqwest::Error),
}

pub type ProxyResult<T> = std::result::Result<T, ProxyError>;
