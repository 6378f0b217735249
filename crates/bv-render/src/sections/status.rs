//! Loading and error states.

use crate::escape::html_escape;

/// Full-page loading indicator.
pub fn render_loading() -> String {
    r#"<main class="bv-status" aria-busy="true">
    <p class="bv-loading animate-pulse text-2xl">Loading...</p>
</main>"#
        .to_string()
}

/// Full-page error message, nothing else.
pub fn render_error(message: &str) -> String {
    format!(
        r#"<main class="bv-status" role="alert">
    <p class="bv-error text-red-400 text-xl">{message}</p>
</main>"#,
        message = html_escape(message),
    )
}
