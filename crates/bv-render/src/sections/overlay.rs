//! Enlarged-image overlay.

use bv_common::AssetKind;

use super::{onerror_handler, ImageSlots, ImageTag};
use crate::config::InteractionMode;
use crate::escape::html_escape;

const ENLARGED_ALT: &str = "Enlarged view";

/// Render the overlay for the current interaction mode.
///
/// In script mode the container is always present and toggled client-side;
/// it starts visible only when `open` is set. In link mode it is rendered
/// only while open, and every close control links back to the bare page.
pub fn render_overlay(
    open: Option<&str>,
    interaction: InteractionMode,
    slots: &mut ImageSlots<'_>,
) -> String {
    match interaction {
        InteractionMode::Script => render_scripted(open, slots),
        InteractionMode::Links => open.map(|path| render_linked(path, slots)).unwrap_or_default(),
    }
}

fn enlarged_image(path: &str, slots: &mut ImageSlots<'_>) -> String {
    ImageTag {
        path,
        alt: ENLARGED_ALT,
        class: "bv-enlarged",
        kind: AssetKind::Overlay,
        lazy: false,
        id: Some("bv-overlay-image"),
    }
    .render(slots)
}

fn render_scripted(open: Option<&str>, slots: &mut ImageSlots<'_>) -> String {
    let (hidden, image) = match open {
        Some(path) => ("", enlarged_image(path, slots)),
        // No src while closed, so nothing is fetched until an image is opened.
        None => (
            " hidden",
            format!(
                r#"<img id="bv-overlay-image" data-src="" alt="{ENLARGED_ALT}" class="bv-enlarged" onerror="{}">"#,
                onerror_handler(AssetKind::Overlay)
            ),
        ),
    };

    format!(
        r#"<div id="bv-overlay" class="bv-overlay" role="dialog" aria-modal="true"{hidden} onclick="bvCloseImage()">
    <div class="bv-overlay-inner" onclick="event.stopPropagation()">
        {image}
        <button type="button" class="bv-close" onclick="bvCloseImage()" aria-label="Close image modal">&#x2715;</button>
    </div>
</div>"#
    )
}

fn render_linked(path: &str, slots: &mut ImageSlots<'_>) -> String {
    format!(
        r#"<div id="bv-overlay" class="bv-overlay" role="dialog" aria-modal="true" data-open="{path}">
    <a class="bv-backdrop" href="?" aria-label="Close image modal"></a>
    <div class="bv-overlay-inner">
        {image}
        <a class="bv-close" href="?" aria-label="Close image modal">&#x2715;</a>
    </div>
</div>"#,
        path = html_escape(path),
        image = enlarged_image(path, slots),
    )
}
