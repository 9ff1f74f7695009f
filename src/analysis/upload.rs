use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use super::error::AnalysisError;

/// Guess the upload MIME type from the file extension
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// Upload audio to the analysis endpoint and return its JSON response.
///
/// Transient failures (network errors, 429, 5xx) are retried with
/// exponential backoff, up to `retries` extra attempts.
pub async fn upload_audio(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: Option<&str>,
    path: &Path,
    audio: &[u8],
    retries: usize,
) -> Result<Value, AnalysisError> {
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(retries);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string());
    let mime = mime_for(path);

    RetryIf::start(
        retry_strategy,
        || send_once(client, endpoint, api_key, &file_name, mime, audio),
        |e: &AnalysisError| {
            let retry = e.is_transient();
            if retry {
                tracing::warn!(error = %e, file = %file_name, "upload failed, retrying");
            }
            retry
        },
    )
    .await
}

async fn send_once(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: Option<&str>,
    file_name: &str,
    mime: &str,
    audio: &[u8],
) -> Result<Value, AnalysisError> {
    let part = Part::bytes(audio.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .map_err(|e| AnalysisError::Network(e.to_string()))?;
    let form = Form::new().part("file", part);

    let mut request = client.post(endpoint).multipart(form);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request
        .send()
        .await
        .map_err(|e| AnalysisError::Network(e.to_string()))?;

    if let Some(err) = AnalysisError::from_status(response.status().as_u16()) {
        return Err(err);
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
}
