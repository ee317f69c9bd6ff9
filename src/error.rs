//! Typed errors for fetching and parsing class statistics.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the statistics body from its reference.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure before a status was received.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The server answered with a non-success status.
    #[error("server returned {status} {status_text} for {url}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },
    /// Reading a local reference (or the response body) failed.
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The reference needs a transport this build was compiled without.
    #[error("cannot fetch {url}: HTTP support is not enabled in this build")]
    Unsupported { url: String },
}

impl FetchError {
    /// Transport status, when the server got far enough to send one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The body does not have the shape of a class statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTableError {
    #[error("table has no row {row}")]
    MissingRow { row: usize },
    #[error("row {row} has no column {column}")]
    MissingCell { row: usize, column: usize },
    #[error("row {row}, column {column}: '{value}' is not a pixel count")]
    NotANumber {
        row: usize,
        column: usize,
        value: String,
    },
    #[error("row {row} has {found} columns, header defines {expected}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Terminal failure of one fetch cycle.
#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Malformed(#[from] MalformedTableError),
}

/// A display request rejected before it reaches the event channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("process output '{identifier}' has no reference URL")]
    EmptyReference { identifier: String },
    #[error("process output '{identifier}' has an empty reference MIME type")]
    EmptyMimeType { identifier: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_http_status_errors() {
        let err = FetchError::Status {
            url: "http://host/x".into(),
            status: 404,
            status_text: "Not Found".into(),
        };
        assert_eq!(err.status(), Some(404));

        let err = FetchError::Transport {
            url: "http://host/x".into(),
            message: "connection refused".into(),
        };
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_statistics_error_is_transparent() {
        let err: StatisticsError = MalformedTableError::MissingRow { row: 1 }.into();
        assert_eq!(err.to_string(), "table has no row 1");
    }
}
