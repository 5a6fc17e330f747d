//! URL utilities for consistent URL handling
//!
//! Base URLs come from user configuration and the environment, so they may
//! or may not carry trailing slashes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use shadowcoder::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/v1beta"), "https://example.com/v1beta");
/// assert_eq!(normalize_base_url("https://example.com/v1beta//"), "https://example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Streaming endpoint for `model`, asking for server-sent events.
///
/// ```
/// use shadowcoder::utils::url::stream_generate_url;
///
/// assert_eq!(
///     stream_generate_url("https://example.com/v1beta/", "gemini-2.5-pro"),
///     "https://example.com/v1beta/models/gemini-2.5-pro:streamGenerateContent?alt=sse"
/// );
/// ```
pub fn stream_generate_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(
        base_url,
        &format!("models/{model}:streamGenerateContent?alt=sse"),
    )
}
