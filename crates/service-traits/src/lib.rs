//! Capability interfaces that plugins register into the host.
//!
//! Each trait has a `Noop` implementation that returns a "not configured"
//! error, allowing the host to run standalone before a plugin is wired in.
//! Plugins install their implementation into [`Services`] under a well-known
//! capability name, and other components resolve it by that name.

use std::{error::Error as StdError, fmt, pin::Pin, sync::Arc};

use {async_trait::async_trait, bytes::Bytes, futures::Stream, serde::Serialize};

/// Capability name of the temp file hosting service.
pub const TEMP_SERVICE: &str = "server.temp";

/// Error type returned by service methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The caller passed something the service cannot interpret.
    #[error("{message}")]
    InvalidInput { message: String },

    /// A local read failed.
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP exchange itself failed (connect, timeout, non-2xx status).
    #[error("{context}: {source}")]
    Network {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The remote API answered but rejected the request.
    #[error("{message}")]
    Remote { message: String },

    /// No implementation is registered for the capability.
    #[error("{message}")]
    Unavailable { message: String },
}

impl ServiceError {
    #[must_use]
    pub fn invalid_input(message: impl fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn remote(message: impl fmt::Display) -> Self {
        Self::Remote {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn network(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ── Temp file hosting ───────────────────────────────────────────────────────

/// A boxed stream of byte chunks, e.g. a file or stdin being read lazily.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Content handed to [`TempService::create`].
pub enum UploadSource {
    /// Fully materialized payload.
    Bytes(Bytes),
    /// A `file:` URL or a remote `http(s):` URL. Must parse as a URL.
    Url(String),
    /// An open byte stream, forwarded without buffering.
    Stream(ByteStream),
}

impl UploadSource {
    /// Wrap any chunk stream.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + 'static,
    {
        Self::Stream(Box::pin(stream))
    }

    /// Short label used in logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Url(_) => "url",
            Self::Stream(_) => "stream",
        }
    }
}

impl fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Url(u) => f.debug_tuple("Url").field(u).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for UploadSource {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for UploadSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<String> for UploadSource {
    fn from(value: String) -> Self {
        Self::Url(value)
    }
}

impl From<&str> for UploadSource {
    fn from(value: &str) -> Self {
        Self::Url(value.to_owned())
    }
}

/// Public location of an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub url: String,
}

#[async_trait]
pub trait TempService: Send + Sync {
    /// Upload `data` and return where it can be fetched from.
    async fn create(&self, data: UploadSource) -> ServiceResult<UploadResult>;
}

pub struct NoopTempService;

#[async_trait]
impl TempService for NoopTempService {
    async fn create(&self, _data: UploadSource) -> ServiceResult<UploadResult> {
        Err(ServiceError::unavailable("temp service not configured"))
    }
}

// ── Registration ────────────────────────────────────────────────────────────

/// Capabilities available to the rest of the host process.
#[derive(Clone)]
pub struct Services {
    pub temp: Arc<dyn TempService>,
    temp_provider: Option<String>,
}

impl Services {
    /// All capabilities backed by `Noop` implementations.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            temp: Arc::new(NoopTempService),
            temp_provider: None,
        }
    }

    /// Install a temp service, recording which plugin provided it.
    #[must_use]
    pub fn with_temp(mut self, provider: impl Into<String>, temp: Arc<dyn TempService>) -> Self {
        self.temp = temp;
        self.temp_provider = Some(provider.into());
        self
    }

    /// Name of the plugin currently backing [`TEMP_SERVICE`], if any.
    #[must_use]
    pub fn temp_provider(&self) -> Option<&str> {
        self.temp_provider.as_deref()
    }

    /// Look up the temp service by capability name.
    #[must_use]
    pub fn resolve_temp(&self, name: &str) -> Option<Arc<dyn TempService>> {
        (name == TEMP_SERVICE).then(|| Arc::clone(&self.temp))
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("temp_provider", &self.temp_provider)
            .finish_non_exhaustive()
    }
}

/// A plugin contributes one or more capabilities to [`Services`].
pub trait Plugin: Send + Sync {
    /// Plugin identifier, also the key of its config table.
    fn name(&self) -> &str;

    /// Register this plugin's capabilities.
    fn apply(&self, services: Services) -> Services;
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTempService;

    #[async_trait]
    impl TempService for FixedTempService {
        async fn create(&self, _data: UploadSource) -> ServiceResult<UploadResult> {
            Ok(UploadResult {
                url: "https://example.com/a.jpg".into(),
            })
        }
    }

    struct FixedPlugin;

    impl Plugin for FixedPlugin {
        fn name(&self) -> &str {
            "fixed"
        }

        fn apply(&self, services: Services) -> Services {
            services.with_temp(self.name(), Arc::new(FixedTempService))
        }
    }

    #[tokio::test]
    async fn noop_temp_service_is_unavailable() {
        let err = NoopTempService
            .create(UploadSource::from(b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable { .. }));
        assert_eq!(err.to_string(), "temp service not configured");
    }

    #[tokio::test]
    async fn plugin_registers_under_capability_name() {
        let services = FixedPlugin.apply(Services::noop());
        assert_eq!(services.temp_provider(), Some("fixed"));

        let temp = services.resolve_temp(TEMP_SERVICE).unwrap();
        let result = temp.create(UploadSource::from("file:///x")).await.unwrap();
        assert_eq!(result.url, "https://example.com/a.jpg");
    }

    #[test]
    fn resolve_unknown_capability() {
        assert!(Services::noop().resolve_temp("server.other").is_none());
    }

    #[test]
    fn upload_source_conversions() {
        assert_eq!(UploadSource::from(Bytes::from_static(b"ab")).kind(), "bytes");
        assert_eq!(UploadSource::from("https://a/b").kind(), "url");
        let stream = futures::stream::iter(vec![Ok(Bytes::from_static(b"c"))]);
        let source = UploadSource::stream(stream);
        assert_eq!(source.kind(), "stream");
        assert_eq!(format!("{source:?}"), "Stream(..)");
    }
}
