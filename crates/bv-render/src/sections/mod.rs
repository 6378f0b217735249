//! Page section fragments.
//!
//! Each section renders one part of the loaded page into an HTML fragment.
//! Image markup is shared: every `<img>` carries its normalized path in
//! `data-src` and an `onerror` hook that swaps in the placeholder.

pub mod body;
pub mod contributors;
pub mod header;
pub mod overlay;
pub mod screenshots;
pub mod status;

use bv_common::paths::{is_placeholder, AssetKind, PLACEHOLDER_PATH};

use crate::config::InteractionMode;
use crate::escape::{html_escape, overlay_href};
use crate::generator::AssetFailure;
use crate::probe::AssetProbe;

/// Tracks image sources for one render pass.
///
/// With a probe configured, paths that do not resolve are rendered with the
/// placeholder source up front and recorded as failures.
pub struct ImageSlots<'a> {
    probe: Option<&'a dyn AssetProbe>,
    failures: Vec<AssetFailure>,
}

impl<'a> ImageSlots<'a> {
    pub fn new(probe: Option<&'a dyn AssetProbe>) -> Self {
        Self {
            probe,
            failures: Vec::new(),
        }
    }

    /// Value for the `src` attribute of an image showing `path`.
    pub fn src(&mut self, path: &str, kind: AssetKind) -> String {
        if path.is_empty() {
            return PLACEHOLDER_PATH.to_string();
        }
        match self.probe {
            Some(probe) if !is_placeholder(path) && !probe.exists(path) => {
                self.failures.push(AssetFailure {
                    path: path.to_string(),
                    kind,
                });
                PLACEHOLDER_PATH.to_string()
            }
            _ => path.to_string(),
        }
    }

    pub fn into_failures(self) -> Vec<AssetFailure> {
        self.failures
    }
}

/// Attributes shared by every rendered image.
pub struct ImageTag<'a> {
    pub path: &'a str,
    pub alt: &'a str,
    pub class: &'a str,
    pub kind: AssetKind,
    pub lazy: bool,
    pub id: Option<&'a str>,
}

impl ImageTag<'_> {
    pub fn render(&self, slots: &mut ImageSlots<'_>) -> String {
        let src = slots.src(self.path, self.kind);
        let mut tag = String::from("<img");
        if let Some(id) = self.id {
            tag.push_str(&format!(r#" id="{}""#, html_escape(id)));
        }
        tag.push_str(&format!(
            r#" src="{src}" data-src="{path}" alt="{alt}" class="{class}""#,
            src = html_escape(&src),
            path = html_escape(self.path),
            alt = html_escape(self.alt),
            class = self.class,
        ));
        if self.lazy {
            tag.push_str(r#" loading="lazy""#);
        }
        tag.push_str(&format!(r#" onerror="{}">"#, onerror_handler(self.kind)));
        tag
    }
}

/// Inline `onerror` handler logging the failure and swapping in the placeholder.
pub fn onerror_handler(kind: AssetKind) -> String {
    html_escape(&format!(
        "bvImageFailed(this, '{}')",
        kind.failure_prefix()
    ))
}

/// Wrap a thumbnail so that activating it opens the overlay on `path`.
///
/// The placeholder and empty paths never open the overlay.
pub fn zoomable(image_html: String, path: &str, interaction: InteractionMode) -> String {
    if path.is_empty() || is_placeholder(path) {
        return image_html;
    }
    match interaction {
        InteractionMode::Script => format!(
            r#"<button type="button" class="bv-zoom" onclick="bvOpenImage(this.dataset.src)" data-src="{}">{}</button>"#,
            html_escape(path),
            image_html
        ),
        InteractionMode::Links => format!(
            r#"<a class="bv-zoom" href="{}">{}</a>"#,
            html_escape(&overlay_href(path)),
            image_html
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NothingExists;

    impl AssetProbe for NothingExists {
        fn exists(&self, _path: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_slots_without_probe_pass_through() {
        let mut slots = ImageSlots::new(None);
        assert_eq!(slots.src("/a.png", AssetKind::Screenshot), "/a.png");
        assert!(slots.into_failures().is_empty());
    }

    #[test]
    fn test_slots_record_missing_assets() {
        let probe = NothingExists;
        let mut slots = ImageSlots::new(Some(&probe));
        assert_eq!(slots.src("/a.png", AssetKind::Photo), PLACEHOLDER_PATH);
        // The placeholder itself is never reported.
        assert_eq!(slots.src(PLACEHOLDER_PATH, AssetKind::Photo), PLACEHOLDER_PATH);
        let failures = slots.into_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, "/a.png");
        assert_eq!(failures[0].kind, AssetKind::Photo);
    }

    #[test]
    fn test_image_tag_markup() {
        let mut slots = ImageSlots::new(None);
        let html = ImageTag {
            path: "/a.png",
            alt: "Bug \"x\" screenshot 1",
            class: "bv-thumb",
            kind: AssetKind::Screenshot,
            lazy: true,
            id: None,
        }
        .render(&mut slots);
        assert!(html.contains(r#"src="/a.png""#));
        assert!(html.contains(r#"data-src="/a.png""#));
        assert!(html.contains("Bug &quot;x&quot; screenshot 1"));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains("bvImageFailed(this, &#x27;Failed to load image&#x27;)"));
    }

    #[test]
    fn test_zoomable_skips_placeholder() {
        let img = "<img>".to_string();
        assert_eq!(
            zoomable(img.clone(), PLACEHOLDER_PATH, InteractionMode::Links),
            "<img>"
        );
        let linked = zoomable(img.clone(), "/a.png", InteractionMode::Links);
        assert!(linked.starts_with(r#"<a class="bv-zoom" href="?image=%2Fa.png">"#));
        let scripted = zoomable(img, "/a.png", InteractionMode::Script);
        assert!(scripted.contains("bvOpenImage(this.dataset.src)"));
    }
}
