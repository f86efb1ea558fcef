/// Errors that can occur while talking to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status
    #[error("server returned status {0}")]
    Status(u16),

    /// The response body was not the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// The server reported an error in the response payload
    #[error("server error: {0}")]
    Server(String),
}
