//! Infrastructure error type.

use std::net::AddrParseError;

/// The error type returned by persona's fallible startup and serving calls.
///
/// Request-level failures (422, 404, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values through
/// [`ApiError`](crate::api::ApiError), not as `Error`s. This type surfaces
/// infrastructure failures: parsing the listen address and binding the port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid listen address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
