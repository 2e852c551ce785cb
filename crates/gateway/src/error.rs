use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not encode request body: {0}")]
    Codec(#[from] serde_json::Error),

    /// A 401 on a protected endpoint. The gateway has already wiped the
    /// in-memory session and the durable tokens by the time this is seen.
    #[error("session expired")]
    SessionExpired,

    /// Any other non-2xx response, passed through to the caller. `message`
    /// is the server's own error string when it sent one; `body` keeps the
    /// raw payload for callers that dig out per-field validation errors.
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        message: Option<String>,
        body: Option<Value>,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The error string the server put in the response payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// First entry of a DRF-style per-field error list, e.g.
    /// `{"appointment_time": ["This time slot is already booked"]}`.
    pub fn field_error(&self, field: &str) -> Option<String> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body
                .get(field)?
                .as_array()?
                .first()?
                .as_str()
                .map(String::from),
            _ => None,
        }
    }
}

/// The error string the backend puts in its payloads, tried in the order
/// the portals have always read them.
pub(crate) fn extract_message(body: &Value) -> Option<String> {
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str).map(String::from))
}
