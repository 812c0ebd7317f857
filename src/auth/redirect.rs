//! Remembers which page a logged-out user asked for so that log-in can send them back.

use crate::endpoints;

/// Accept `raw_url` as a post-log-in target only if it is a local path.
///
/// Absolute URLs, protocol-relative URLs (`//host`) and the log-in page
/// itself are rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let raw_url = raw_url.trim();
    let path = raw_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(raw_url);

    let is_local =
        raw_url.starts_with('/') && !raw_url.starts_with("//") && !raw_url.contains('\\');

    (is_local && path != endpoints::LOG_IN_VIEW).then(|| raw_url.to_owned())
}

/// The log-in page URL that returns the user to `target` afterwards.
pub fn build_log_in_redirect_url(target: &str) -> String {
    match normalize_redirect_url(target)
        .and_then(|target| serde_urlencoded::to_string([("redirect_url", target)]).ok())
    {
        Some(query) => format!("{}?{}", endpoints::LOG_IN_VIEW, query),
        None => endpoints::LOG_IN_VIEW.to_owned(),
    }
}
