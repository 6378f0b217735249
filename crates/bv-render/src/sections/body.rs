//! Bug body section.

use bv_common::display::{body_content, BodyContent, NO_DESCRIPTION};
use bv_common::BugSnapshot;

use crate::escape::html_escape;
use crate::markdown::render_markdown;

/// Render the body: markdown content, then the plain description, then a notice.
pub fn render_body(snapshot: &BugSnapshot) -> String {
    let inner = match body_content(snapshot.content(), snapshot.description()) {
        BodyContent::Markdown(md) => format!(
            r#"<div class="bv-markdown prose">{}</div>"#,
            render_markdown(md)
        ),
        BodyContent::Plain(text) => format!(
            r#"<p class="bv-description">{}</p>"#,
            html_escape(text)
        ),
        BodyContent::Missing => format!(r#"<p class="bv-muted">{NO_DESCRIPTION}</p>"#),
    };

    format!(
        r#"<section class="bv-body mb-12">
    {inner}
</section>"#
    )
}
