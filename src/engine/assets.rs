//! KaTeX stylesheet on the CDN
//!
//! Rendered markup needs the KaTeX stylesheet of the same release. Pages
//! either link it from the CDN or embed a downloaded copy.

use crate::error::{MathError, MathResult};
use tracing::debug;

const CDN_BASE: &str = "https://cdn.jsdelivr.net/npm/katex@";

/// CDN directory for a pinned release
pub fn dist_url(version: &str) -> String {
    format!("{}{}/dist/", CDN_BASE, version)
}

/// Pinned stylesheet URL
pub fn stylesheet_url(version: &str) -> String {
    format!("{}katex.min.css", dist_url(version))
}

/// Download the stylesheet, rewriting relative font URLs to the CDN so the
/// copy works when embedded in a page
pub async fn fetch_stylesheet(version: &str) -> MathResult<String> {
    let url = stylesheet_url(version);
    let dist = dist_url(version);

    let css = tokio::task::spawn_blocking(move || fetch_text(&url))
        .await
        .map_err(|e| MathError::Internal(format!("stylesheet download task: {}", e)))??;

    Ok(absolutize_fonts(&css, &dist))
}

fn fetch_text(url: &str) -> MathResult<String> {
    debug!("Fetching {}", url);
    let fetch_error = |reason: String| MathError::AssetFetch {
        url: url.to_string(),
        reason,
    };

    let mut response = ureq::get(url)
        .call()
        .map_err(|e| fetch_error(e.to_string()))?;
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| fetch_error(e.to_string()))
}

/// Point `url(fonts/...)` references at the CDN
pub(crate) fn absolutize_fonts(css: &str, dist: &str) -> String {
    css.replace("url(fonts/", &format!("url({}fonts/", dist))
}
