use crate::utils::error::UpstreamFailure;
use reqwest::RequestBuilder;
use std::time::Duration;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// 送出請求並將回應解析為 JSON。非 2xx 時讀取 body 文字作為錯誤內容，不重試。
pub async fn execute_json(
    request: RequestBuilder,
    timeout: Option<Duration>,
) -> Result<serde_json::Value, UpstreamFailure> {
    let request = match timeout {
        Some(duration) => request.timeout(duration),
        None => request,
    };

    let response = request.send().await?;
    let status = response.status();
    tracing::debug!("Upstream response status: {} ({})", status, response.url());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read error body: {}", e);
            status.canonical_reason().unwrap_or_default().to_string()
        });
        return Err(UpstreamFailure::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| UpstreamFailure::InvalidResponse(e.to_string()))
}

/// 以 base URL 與路徑片段組出 endpoint；片段會做 percent-encoding
pub fn endpoint(base_url: &str, segments: &[&str]) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    url
}
