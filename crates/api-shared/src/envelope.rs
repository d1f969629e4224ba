use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned with status 500 when a proxy route cannot reach the upstream.
///
/// The message is a static, human-readable description per route. The underlying failure
/// (DNS, refused connection, reset) is logged but never exposed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
