//! Header section: back control, title and date.

use bv_common::display::{display_date, display_title};
use bv_common::BugSnapshot;

use crate::escape::html_escape;

/// Back control shown above a loaded bug.
pub fn render_back_button() -> String {
    r#"<button type="button" class="bv-back" onclick="history.back()" aria-label="Go back to previous page">&larr; Back</button>"#
        .to_string()
}

/// Render the header section.
pub fn render_header(snapshot: &BugSnapshot) -> String {
    let title = display_title(snapshot.title());
    let date = display_date(snapshot.date());

    format!(
        r#"<header class="bv-header mb-12">
    {back}
    <h1 class="bv-title text-5xl font-bold mb-4">{title}</h1>
    <p class="bv-date text-xl">{date}</p>
    <hr class="bv-rule">
</header>"#,
        back = render_back_button(),
        title = html_escape(title),
        date = html_escape(&date),
    )
}
