use std::path::Path;

use {
    anyhow::{Context, Result, bail},
    server_temp_service_traits::{Services, TEMP_SERVICE, UploadSource},
    tokio_util::io::ReaderStream,
    tracing::info,
    url::Url,
};

/// Turn a command-line argument into an upload source.
///
/// `-` streams stdin, anything that parses as a URL with a scheme longer than
/// one character is passed through, and everything else is treated as a local
/// path and converted to a `file:` URL.
pub fn source_from_arg(input: &str) -> Result<UploadSource> {
    if input == "-" {
        return Ok(UploadSource::stream(ReaderStream::new(tokio::io::stdin())));
    }

    // A single-letter scheme is a Windows drive, not a URL.
    if let Ok(url) = Url::parse(input)
        && url.scheme().len() > 1
    {
        return Ok(UploadSource::Url(url.into()));
    }

    let path = Path::new(input);
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("cannot resolve local file {}", path.display()))?;
    match Url::from_file_path(&absolute) {
        Ok(url) => Ok(UploadSource::Url(url.into())),
        Err(()) => bail!("cannot express {} as a file URL", absolute.display()),
    }
}

pub async fn handle_upload(services: &Services, input: &str, json: bool) -> Result<()> {
    let Some(temp) = services.resolve_temp(TEMP_SERVICE) else {
        bail!("no service registered as {TEMP_SERVICE}");
    };

    let source = source_from_arg(input)?;
    info!(source = source.kind(), "uploading");
    let result = temp
        .create(source)
        .await
        .with_context(|| format!("upload of {input} failed"))?;

    if json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", result.url);
    }
    Ok(())
}
