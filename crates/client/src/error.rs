/// Errors returned by a [`ProductApi`](crate::ProductApi) call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service could not be reached (DNS, refused connection, timeout).
    #[error("could not connect to registry at {url}: {message}")]
    Connection { url: String, message: String },

    /// The service answered with a non-success status.
    #[error("registry returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("could not parse registry response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when the service was never reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection { .. })
    }
}
