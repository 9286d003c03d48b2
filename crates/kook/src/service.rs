use {
    async_trait::async_trait,
    reqwest::{Client, header::AUTHORIZATION, multipart::Form},
    secrecy::{ExposeSecret, Secret},
    server_temp_service_traits::{ServiceResult, TempService, UploadResult, UploadSource},
    tracing::{debug, info},
};

#[cfg(feature = "metrics")]
use {
    crate::metric_names::{UPLOAD_DURATION_SECONDS, UPLOAD_FAILURES_TOTAL, UPLOADS_TOTAL},
    metrics::{counter, histogram},
};

use crate::{
    config::KookTempConfig,
    envelope::RemoteEnvelope,
    error::{Error, Result},
    source::{classify, resolve},
};

/// Multipart field KOOK reads the asset from.
const FILE_FIELD: &str = "file";

/// Filename sent for every upload. KOOK serves the asset under a generated
/// name, so the original filename is not forwarded.
const FILE_NAME: &str = "image.jpg";

const FILE_MIME: &str = "image/jpeg";

/// Uploads assets to KOOK and returns their public URL.
///
/// Holds no per-call state; clones share the underlying connection pool.
#[derive(Clone)]
pub struct KookTempService {
    client: Client,
    token: Secret<String>,
    endpoint: String,
}

impl std::fmt::Debug for KookTempService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KookTempService")
            .field("token", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl KookTempService {
    #[must_use]
    pub fn new(config: KookTempConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use a caller-provided client, e.g. one with a timeout or proxy.
    #[must_use]
    pub fn with_client(client: Client, config: KookTempConfig) -> Self {
        Self {
            client,
            token: config.token,
            endpoint: config.endpoint,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `data` and return the hosted URL.
    ///
    /// Every call performs its own POST; nothing is cached or retried.
    pub async fn upload(&self, data: UploadSource) -> Result<UploadResult> {
        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();
        #[cfg(feature = "metrics")]
        counter!(UPLOADS_TOTAL, "source" => data.kind()).increment(1);

        let result = self.upload_inner(data).await;

        #[cfg(feature = "metrics")]
        {
            histogram!(UPLOAD_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
            if let Err(ref e) = result {
                counter!(UPLOAD_FAILURES_TOTAL, "kind" => e.kind()).increment(1);
            }
        }

        result
    }

    async fn upload_inner(&self, data: UploadSource) -> Result<UploadResult> {
        let source = classify(data)?;
        debug!(source = source.kind(), "resolving upload source");
        let payload = resolve(&self.client, source).await?;

        let part = payload
            .into_part()
            .file_name(FILE_NAME)
            .mime_str(FILE_MIME)
            .map_err(|e| Error::http("failed to build file part", e))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bot {}", self.token.expose_secret()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::http("failed to send asset upload request", e))?
            .error_for_status()
            .map_err(|e| Error::http("asset upload request failed", e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::http("failed to read asset upload response", e))?;

        let result = RemoteEnvelope::parse(&body)?.into_result()?;
        info!(url = %result.url, "asset uploaded");
        Ok(result)
    }
}

#[async_trait]
impl TempService for KookTempService {
    async fn create(&self, data: UploadSource) -> ServiceResult<UploadResult> {
        self.upload(data).await.map_err(Into::into)
    }
}
