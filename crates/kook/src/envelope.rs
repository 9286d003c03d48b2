use {serde::Deserialize, server_temp_service_traits::UploadResult, tracing::warn};

use crate::error::{Error, Result};

/// KOOK's response wrapper. `code == 0` means success regardless of the HTTP
/// status having already been 2xx.
#[derive(Debug, Deserialize)]
pub(crate) struct RemoteEnvelope {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<AssetData>,
}

#[derive(Debug, Deserialize)]
struct AssetData {
    url: String,
}

impl RemoteEnvelope {
    pub(crate) fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(Error::malformed)
    }

    pub(crate) fn into_result(self) -> Result<UploadResult> {
        if self.code != 0 {
            let message = self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("asset upload rejected with code {}", self.code));
            warn!(code = self.code, %message, "asset upload rejected");
            return Err(Error::Remote {
                code: self.code,
                message,
            });
        }
        match self.data {
            Some(AssetData { url }) => Ok(UploadResult { url }),
            None => Err(Error::malformed("missing data.url")),
        }
    }
}
