//! Transport-level errors.

use thiserror::Error;

/// Errors raised by collaborator calls and the HTTP transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP client could not be initialized.
    #[error("failed to initialize HTTP client: {message}")]
    Init { message: String },

    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with an unexpected status code.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// A log link resolved to a document without a redirect URL.
    #[error("no redirect in log response from {url}")]
    MissingRedirect { url: String },

    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A HEAD probe did not report a content length.
    #[error("no content length reported for {url}")]
    MissingContentLength { url: String },
}
