//! Screenshot gallery section.

use bv_common::display::{screenshot_alt, NO_SCREENSHOTS};
use bv_common::{AssetKind, BugSnapshot};

use super::{zoomable, ImageSlots, ImageTag};
use crate::config::InteractionMode;

/// Render the screenshot grid, or the empty-gallery notice.
pub fn render_screenshots(
    snapshot: &BugSnapshot,
    interaction: InteractionMode,
    slots: &mut ImageSlots<'_>,
) -> String {
    let images = snapshot.images();
    if images.is_empty() {
        return format!(
            r#"<section class="bv-screenshots mb-12">
    <p class="bv-muted">{NO_SCREENSHOTS}</p>
</section>"#
        );
    }

    let tiles: Vec<String> = images
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let alt = screenshot_alt(snapshot.title(), idx);
            let img = ImageTag {
                path,
                alt: &alt,
                class: "bv-thumb",
                kind: AssetKind::Screenshot,
                lazy: true,
                id: None,
            }
            .render(slots);
            format!(
                r#"<div class="bv-tile">{}</div>"#,
                zoomable(img, path, interaction)
            )
        })
        .collect();

    format!(
        r#"<section class="bv-screenshots mb-12">
    <h2 class="bv-section-title text-3xl font-bold mb-6">Project Screenshots</h2>
    <div class="bv-grid">
        {}
    </div>
</section>"#,
        tiles.join("\n        ")
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
    fn test_empty_gallery_notice() {
        let mut slots = ImageSlots::new(None);
        let html = render_screenshots(
            &snapshot(r#"[{"id":"1","images":[]}]"#),
            InteractionMode::Script,
            &mut slots,
        );
        assert!(html.contains("No project screenshots available."));
        assert!(!html.contains("<img"));
        assert!(!html.contains("Project Screenshots"));
    }

    #[test]
    fn test_gallery_tiles_in_order() {
        let mut slots = ImageSlots::new(None);
        let html = render_screenshots(
            &snapshot(r#"[{"id":"1","title":"Crash","images":["./a.png","b.png","/c.png"]}]"#),
            InteractionMode::Links,
            &mut slots,
        );
        let a = html.find(r#"data-src="/a.png""#).unwrap();
        let b = html.find(r#"data-src="/b.png""#).unwrap();
        let c = html.find(r#"data-src="/c.png""#).unwrap();
        assert!(a < b && b < c);
        assert!(html.contains("Bug Crash screenshot 1"));
        assert!(html.contains("Bug Crash screenshot 3"));
        assert!(html.contains(r#"href="?image=%2Fb.png""#));
        let heading = html.find(">Project Screenshots</h2>").unwrap();
        assert!(heading < a);
    }
}
