//! Contributors section.

use bv_common::display::{contributor_name, linkedin_label, photo_alt, NO_CONTRIBUTORS};
use bv_common::{AssetKind, BugSnapshot, Contributor};

use super::{zoomable, ImageSlots, ImageTag};
use crate::config::InteractionMode;
use crate::escape::html_escape;

/// Render the contributors list, or the empty-list notice.
pub fn render_contributors(
    snapshot: &BugSnapshot,
    interaction: InteractionMode,
    slots: &mut ImageSlots<'_>,
) -> String {
    let contributors = snapshot.contributors();
    if contributors.is_empty() {
        return format!(
            r#"<section class="bv-team">
    <p class="bv-muted">{NO_CONTRIBUTORS}</p>
</section>"#
        );
    }

    let cards: Vec<String> = contributors
        .iter()
        .map(|c| render_card(c, interaction, slots))
        .collect();
    format!(
        r#"<section class="bv-team">
    <h2 class="bv-section-title text-3xl font-bold mb-6">Contributors</h2>
    <ul class="bv-contributors">
        {}
    </ul>
</section>"#,
        cards.join("\n        ")
    )
}

fn render_card(
    contributor: &Contributor,
    interaction: InteractionMode,
    slots: &mut ImageSlots<'_>,
) -> String {
    let alt = photo_alt(contributor.name());
    let photo = ImageTag {
        path: contributor.photo(),
        alt: &alt,
        class: "bv-avatar",
        kind: AssetKind::Photo,
        lazy: true,
        id: None,
    }
    .render(slots);

    let linkedin = contributor
        .linkedin()
        .map(|url| {
            format!(
                r#"<a class="bv-linkedin" href="{url}" target="_blank" rel="noopener noreferrer" aria-label="{label}">LinkedIn</a>"#,
                url = html_escape(url),
                label = html_escape(&linkedin_label(contributor.name())),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li class="bv-card">{photo}<span class="bv-name">{name}</span>{linkedin}</li>"#,
        photo = zoomable(photo, contributor.photo(), interaction),
        name = html_escape(contributor_name(contributor.name())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_common::parse_bug_list;

    fn snapshot(json: &str) -> BugSnapshot {
        let record = parse_bug_list(json).unwrap().records().next().unwrap().unwrap();
        BugSnapshot::normalize(record).unwrap()
    }

    #[test]
    fn test_contributor_card() {
        let mut slots = ImageSlots::new(None);
        let html = render_contributors(
            &snapshot(
                r#"[{"id":"1","students":[{"name":"Ana","photo":"ana.jpg","linkedin":"https://linkedin.com/in/ana"}]}]"#,
            ),
            InteractionMode::Script,
            &mut slots,
        );
        assert!(html.contains(r#"data-src="/ana.jpg""#));
        assert!(html.contains("Ana&#x27;s profile"));
        assert!(html.contains(r#"href="https://linkedin.com/in/ana""#));
        assert!(html.contains("Visit Ana&#x27;s LinkedIn profile"));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains(">Contributors</h2>"));
    }

    #[test]
    fn test_anonymous_contributor_without_photo() {
        let mut slots = ImageSlots::new(None);
        let html = render_contributors(
            &snapshot(r#"[{"id":"1","students":[{}]}]"#),
            InteractionMode::Links,
            &mut slots,
        );
        assert!(html.contains("Unknown"));
        assert!(html.contains(r#"src="/placeholder.jpg""#));
        assert!(html.contains("Contributor&#x27;s profile"));
        assert!(!html.contains("LinkedIn</a>"));
        // The placeholder never opens the overlay.
        assert!(!html.contains("?image="));
    }

    #[test]
    fn test_empty_contributors_notice() {
        let mut slots = ImageSlots::new(None);
        let html = render_contributors(
            &snapshot(r#"[{"id":"1"}]"#),
            InteractionMode::Script,
            &mut slots,
        );
        assert!(html.contains("No contributors listed."));
        assert!(!html.contains("<h2"));
    }
}
