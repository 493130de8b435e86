//! Avatar URL normalization.
//!
//! Profiles store whatever the upload widget handed back: a full URL, a
//! protocol-relative URL or a bare object path inside the public avatar
//! bucket. Templates and the JSON API always receive an absolute URL.

/// Image shown when a profile has no avatar.
pub const DEFAULT_AVATAR_URL: &str = "/assets/img/avatar.svg";

/// Resolves a stored avatar reference into a URL that can be rendered.
pub fn normalize_avatar_url(raw: Option<&str>, storage_base: &str) -> String {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return DEFAULT_AVATAR_URL.to_string(),
    };

    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        return raw.to_string();
    }

    if let Some(rest) = raw.strip_prefix("//") {
        return format!("https://{rest}");
    }

    let base = storage_base.trim().trim_end_matches('/');
    let path = raw.trim_start_matches('/');
    if base.is_empty() {
        return format!("/{path}");
    }
    format!("{base}/{path}")
}
