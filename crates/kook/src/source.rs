//! Normalizes the accepted input shapes into something a multipart part can
//! carry: either an in-memory buffer or a live byte stream.

use std::path::PathBuf;

use {
    bytes::Bytes,
    reqwest::{Body, Client, multipart::Part},
    server_temp_service_traits::{ByteStream, UploadSource},
    tracing::debug,
    url::Url,
};

use crate::error::{Error, Result};

/// An [`UploadSource`] after its URL, if any, has been parsed and split by
/// scheme.
pub(crate) enum Classified {
    Bytes(Bytes),
    File(PathBuf),
    Remote(Url),
    Stream(ByteStream),
}

impl Classified {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::File(_) => "file",
            Self::Remote(_) => "remote",
            Self::Stream(_) => "stream",
        }
    }
}

/// Upload body ready to be placed in a form part.
pub(crate) enum Payload {
    Bytes(Bytes),
    Stream(Body),
}

impl Payload {
    pub(crate) fn into_part(self) -> Part {
        match self {
            Self::Bytes(bytes) => Part::stream(Body::from(bytes)),
            Self::Stream(body) => Part::stream(body),
        }
    }
}

/// Parse a string source as a URL and decide how it will be read.
///
/// Performs no I/O, so a malformed string fails before any request is made.
pub(crate) fn classify(source: UploadSource) -> Result<Classified> {
    match source {
        UploadSource::Bytes(bytes) => Ok(Classified::Bytes(bytes)),
        UploadSource::Stream(stream) => Ok(Classified::Stream(stream)),
        UploadSource::Url(input) => {
            let url = match Url::parse(&input) {
                Ok(url) => url,
                Err(source) => return Err(Error::InvalidUrl { input, source }),
            };
            if url.scheme() == "file" {
                let path = url.to_file_path().map_err(|()| {
                    Error::invalid_input(format!("file URL does not name a local path: {url}"))
                })?;
                Ok(Classified::File(path))
            } else {
                Ok(Classified::Remote(url))
            }
        },
    }
}

/// Read or fetch a classified source.
///
/// Local files are read fully. Remote URLs are fetched with a single GET and
/// the response body is handed on as a stream without waiting for it to
/// finish.
pub(crate) async fn resolve(client: &Client, source: Classified) -> Result<Payload> {
    match source {
        Classified::Bytes(bytes) => Ok(Payload::Bytes(bytes)),
        Classified::Stream(stream) => Ok(Payload::Stream(Body::wrap_stream(stream))),
        Classified::File(path) => {
            debug!(path = %path.display(), "reading upload source from disk");
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Payload::Bytes(Bytes::from(data))),
                Err(source) => Err(Error::Io { path, source }),
            }
        },
        Classified::Remote(url) => {
            debug!(%url, "fetching upload source");
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::http("failed to fetch upload source", e))?
                .error_for_status()
                .map_err(|e| Error::http("upload source fetch failed", e))?;
            Ok(Payload::Stream(Body::wrap_stream(response.bytes_stream())))
        },
    }
}
