use axum::http::HeaderMap;

/// Whether the request declared incremental-update intent — the
/// conventional in-page AJAX refresh header. Such requests receive the
/// reduced list fragment instead of the full page payload.
pub fn wants_fragment(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}
