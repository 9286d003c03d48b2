use std::path::PathBuf;

use server_temp_service_traits::ServiceError;

/// Crate-wide result type for KOOK uploads.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source string is not a URL.
    #[error("invalid upload source {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Input or configuration that parses but cannot be used.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Reading a `file:` source failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport or status failure on the source fetch or the upload.
    #[error("{context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// KOOK answered with a non-zero code. Displays the remote message only.
    #[error("{message}")]
    Remote { code: i64, message: String },

    /// The upload response could not be interpreted.
    #[error("malformed asset response: {message}")]
    MalformedResponse { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn http(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            context: context.into(),
            source,
        }
    }

    #[must_use]
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            message: message.to_string(),
        }
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } | Self::InvalidInput { .. } => "invalid_input",
            Self::Io { .. } => "io",
            Self::Http { .. } => "http",
            Self::Remote { .. } => "remote",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidUrl { .. } | Error::InvalidInput { .. } => {
                Self::invalid_input(err.to_string())
            },
            Error::Io { path, source } => Self::Filesystem {
                context: format!("failed to read {}", path.display()),
                source,
            },
            Error::Http { context, source } => Self::network(context, source),
            Error::Remote { message, .. } => Self::remote(message),
            Error::MalformedResponse { .. } => Self::remote(err.to_string()),
        }
    }
}
