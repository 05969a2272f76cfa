//! HTTP route handlers

pub mod organisms;
pub mod proteins;

use axum::http::HeaderMap;

/// Whether the request came from the partial-update client (HTMX sets the
/// `HX-Request` header); those get the results fragment, everyone else the
/// full page.
pub fn wants_partial(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}
