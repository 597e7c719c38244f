//! Input validation for crawl requests.

use url::Url;

use crate::errors::CrawlError;

/// Parses and validates a crawl target.
///
/// Only absolute `http`/`https` URLs with a host are accepted.
pub fn validate_url(input: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(input.trim())
        .map_err(|e| CrawlError::invalid_input(format!("invalid URL {input:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::invalid_input(format!(
            "unsupported URL scheme {:?} in {input:?}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::invalid_input(format!("URL has no host: {input:?}")));
    }

    Ok(url)
}

/// Validates a chunk size override.
pub fn validate_chunk_size(size: usize) -> Result<usize, CrawlError> {
    if size == 0 {
        return Err(CrawlError::invalid_input("chunk size must be positive"));
    }
    Ok(size)
}
