//! Page generator implementation.

use std::path::Path;
use std::sync::Arc;

use bv_common::display::display_title;
use bv_common::paths::PLACEHOLDER_PATH;
use bv_common::{AssetKind, BugSnapshot};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::escape::html_escape;
use crate::probe::AssetProbe;
use crate::sections::body::render_body;
use crate::sections::contributors::render_contributors;
use crate::sections::header::render_header;
use crate::sections::overlay::render_overlay;
use crate::sections::screenshots::render_screenshots;
use crate::sections::status::{render_error, render_loading};
use crate::sections::ImageSlots;

/// What the page shows.
#[derive(Debug, Clone, Copy)]
pub enum PageModel<'a> {
    /// A fetch is in flight.
    Loading,
    /// The load failed with a user-visible message.
    Failed { message: &'a str },
    /// A bug is loaded; `overlay` is the path of the enlarged image, if any.
    Ready {
        snapshot: &'a BugSnapshot,
        overlay: Option<&'a str>,
    },
}

impl PageModel<'_> {
    /// Short state name for logs.
    pub fn state_name(&self) -> &'static str {
        match self {
            PageModel::Loading => "loading",
            PageModel::Failed { .. } => "failed",
            PageModel::Ready { .. } => "ready",
        }
    }
}

/// An image replaced with the placeholder at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFailure {
    pub path: String,
    pub kind: AssetKind,
}

impl AssetFailure {
    /// Diagnostic line, e.g. `Failed to load image: /a.png`.
    pub fn message(&self) -> String {
        self.kind.failure_message(&self.path)
    }
}

/// A rendered page and the assets that did not resolve.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub asset_failures: Vec<AssetFailure>,
}

/// Page generator.
#[derive(Clone)]
pub struct PageGenerator {
    config: RenderConfig,
    probe: Option<Arc<dyn AssetProbe>>,
}

impl PageGenerator {
    /// Create a new page generator with configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            probe: None,
        }
    }

    /// Create a generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(RenderConfig::default())
    }

    /// Check image paths against `probe` while rendering.
    pub fn with_probe(mut self, probe: Arc<dyn AssetProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a page for the given view state.
    pub fn render(&self, model: &PageModel<'_>) -> Result<RenderedPage> {
        self.config.validate()?;

        let mut slots = ImageSlots::new(self.probe.as_deref());
        let (title, main) = match model {
            PageModel::Loading => (self.page_title(None), render_loading()),
            PageModel::Failed { message } => (self.page_title(None), render_error(message)),
            PageModel::Ready { snapshot, overlay } => (
                self.page_title(Some(*snapshot)),
                self.render_ready(snapshot, *overlay, &mut slots),
            ),
        };
        let asset_failures = slots.into_failures();
        for failure in &asset_failures {
            debug!(path = %failure.path, kind = %failure.kind, "{}", failure.message());
        }

        let html = self.generate_html(&title, &main);
        let html = if self.config.minify {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = html.len(),
            state = model.state_name(),
            asset_failures = asset_failures.len(),
            "Page rendered"
        );

        Ok(RenderedPage {
            html,
            asset_failures,
        })
    }

    /// Render a page and write it to `path`.
    pub fn write_page(&self, model: &PageModel<'_>, path: &Path) -> Result<RenderedPage> {
        let page = self.render(model)?;
        std::fs::write(path, &page.html)?;
        debug!(path = %path.display(), "Page written");
        Ok(page)
    }

    fn page_title(&self, snapshot: Option<&BugSnapshot>) -> String {
        match snapshot {
            Some(s) => format!(
                "{} | {}",
                display_title(s.title()),
                self.config.title_suffix
            ),
            None => self.config.title_suffix.clone(),
        }
    }

    fn render_ready(
        &self,
        snapshot: &BugSnapshot,
        overlay: Option<&str>,
        slots: &mut ImageSlots<'_>,
    ) -> String {
        let interaction = self.config.interaction;
        format!(
            r#"<main class="bv-page max-w-5xl mx-auto px-4 py-12" data-bug-id="{id}">
{header}
{screenshots}
{body}
{contributors}
</main>
{overlay}"#,
            id = html_escape(snapshot.id().as_str()),
            header = render_header(snapshot),
            screenshots = render_screenshots(snapshot, interaction, slots),
            body = render_body(snapshot),
            contributors = render_contributors(snapshot, interaction, slots),
            overlay = render_overlay(overlay, interaction, slots),
        )
    }

    fn generate_html(&self, title: &str, main: &str) -> String {
        let stylesheet = self
            .config
            .stylesheet
            .as_ref()
            .map(|lib| {
                format!(
                    r#"<link rel="stylesheet" href="{}">"#,
                    html_escape(&lib.url(&self.config.cdn_base_url))
                )
            })
            .unwrap_or_default();

        format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="bv-render {version}">
    {stylesheet}
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f3f4f6;
            --text-primary: #111827;
            --text-secondary: #4b5563;
            --accent-color: #0891b2;
            --error-color: #dc2626;
        }}
        .dark {{
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --accent-color: #22d3ee;
            --error-color: #f87171;
        }}
        @media (prefers-color-scheme: dark) {{
            :root:not(.light) {{
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f9fafb;
                --text-secondary: #9ca3af;
                --accent-color: #22d3ee;
                --error-color: #f87171;
            }}
        }}
        body {{
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.6;
            min-height: 100vh;
        }}
        .bv-back {{
            color: var(--accent-color);
            background: none;
            border: none;
            cursor: pointer;
            margin-bottom: 2rem;
        }}
        .bv-title {{ color: var(--accent-color); }}
        .bv-date, .bv-muted {{ color: var(--text-secondary); }}
        .bv-rule {{ border-color: var(--bg-secondary); margin-top: 1.5rem; }}
        .bv-grid {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr));
            gap: 1rem;
        }}
        .bv-zoom {{
            display: block;
            padding: 0;
            border: none;
            background: none;
            cursor: zoom-in;
        }}
        .bv-thumb {{
            width: 100%;
            height: 12rem;
            object-fit: cover;
            border-radius: 0.5rem;
        }}
        .bv-markdown h1, .bv-markdown h2, .bv-markdown h3 {{
            color: var(--accent-color);
            font-weight: 700;
            margin: 1.5rem 0 0.75rem;
        }}
        .bv-markdown p, .bv-markdown ul, .bv-markdown ol {{ margin-bottom: 1rem; }}
        .bv-markdown a {{ color: var(--accent-color); text-decoration: underline; }}
        .bv-markdown code {{
            background-color: var(--bg-secondary);
            border-radius: 0.25rem;
            padding: 0.1rem 0.3rem;
        }}
        .bv-contributors {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr));
            gap: 1.5rem;
            list-style: none;
            padding: 0;
        }}
        .bv-card {{
            display: flex;
            flex-direction: column;
            align-items: center;
            gap: 0.5rem;
            background-color: var(--bg-secondary);
            border-radius: 0.5rem;
            padding: 1.5rem;
        }}
        .bv-avatar {{
            width: 6rem;
            height: 6rem;
            object-fit: cover;
            border-radius: 9999px;
        }}
        .bv-linkedin {{ color: var(--accent-color); }}
        .bv-status {{
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            gap: 1.5rem;
            min-height: 100vh;
        }}
        .bv-error {{ color: var(--error-color); }}
        .bv-overlay {{
            position: fixed;
            inset: 0;
            z-index: 50;
            display: flex;
            align-items: center;
            justify-content: center;
            background-color: rgba(0, 0, 0, 0.85);
        }}
        .bv-overlay[hidden] {{ display: none; }}
        .bv-backdrop {{ position: absolute; inset: 0; }}
        .bv-overlay-inner {{ position: relative; max-width: 90vw; max-height: 90vh; }}
        .bv-enlarged {{ max-width: 90vw; max-height: 90vh; object-fit: contain; }}
        .bv-close {{
            position: absolute;
            top: -2.5rem;
            right: 0;
            color: #ffffff;
            background: none;
            border: none;
            font-size: 1.5rem;
            cursor: pointer;
            text-decoration: none;
        }}
    </style>
    <script>
        const BV_PLACEHOLDER = '{placeholder}';

        function bvImageFailed(img, prefix) {{
            if (img.dataset.failed) return;
            img.dataset.failed = '1';
            console.warn(prefix + ': ' + img.dataset.src);
            img.src = BV_PLACEHOLDER;
        }}

        function bvOpenImage(path) {{
            if (!path || path === BV_PLACEHOLDER) return;
            const overlay = document.getElementById('bv-overlay');
            const img = document.getElementById('bv-overlay-image');
            if (!overlay || !img) return;
            delete img.dataset.failed;
            img.dataset.src = path;
            img.src = path;
            overlay.hidden = false;
        }}

        function bvCloseImage() {{
            const overlay = document.getElementById('bv-overlay');
            if (overlay) overlay.hidden = true;
        }}

        document.addEventListener('keydown', event => {{
            if (event.key === 'Escape') bvCloseImage();
        }});
    </script>
</head>
<body>
{main}
</body>
</html>"##,
            theme_class = self.config.theme.css_class(),
            title = html_escape(title),
            version = env!("CARGO_PKG_VERSION"),
            stylesheet = stylesheet,
            placeholder = PLACEHOLDER_PATH,
            main = main,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InteractionMode;
    use crate::error::RenderError;
    use bv_common::parse_bug_list;

    fn snapshot(json: &str) -> BugSnapshot {
        let record = parse_bug_list(json).unwrap().records().next().unwrap().unwrap();
        BugSnapshot::normalize(record).unwrap()
    }

    struct Missing;

    impl AssetProbe for Missing {
        fn exists(&self, path: &str) -> bool {
            !path.contains("missing")
        }
    }

    #[test]
    fn test_page_generator_default() {
        let generator = PageGenerator::default_config();
        assert!(!generator.config().minify);
    }

    #[test]
    fn test_loading_page() {
        let page = PageGenerator::default_config()
            .render(&PageModel::Loading)
            .unwrap();
        assert!(page.html.starts_with("<!DOCTYPE html>"));
        assert!(page.html.contains("Loading..."));
        assert!(page.html.contains("<title>Bug Details</title>"));
    }

    #[test]
    fn test_failed_page() {
        let page = PageGenerator::default_config()
            .render(&PageModel::Failed {
                message: "Bug 7 not found",
            })
            .unwrap();
        assert!(page.html.contains("Bug 7 not found"));
        assert!(page.html.contains("text-red-400"));
        assert!(!page.html.contains("Loading..."));
        assert!(!page.html.contains("history.back()"));
    }

    #[test]
    fn test_ready_page() {
        let snap = snapshot(
            r#"[{"id":"7","title":"Crash","date":"2024-03-01","images":["a.png"],"content":"Hi"}]"#,
        );
        let page = PageGenerator::default_config()
            .render(&PageModel::Ready {
                snapshot: &snap,
                overlay: None,
            })
            .unwrap();
        assert!(page.html.contains("<title>Crash | Bug Details</title>"));
        assert!(page.html.contains(r#"data-bug-id="7""#));
        assert!(page.html.contains("March 1, 2024"));
        assert!(page.html.contains(r#"data-src="/a.png""#));
        assert!(page.asset_failures.is_empty());
    }

    #[test]
    fn test_probe_failures_reported() {
        let snap = snapshot(
            r#"[{"id":"7","images":["/ok.png","/missing.png"],"students":[{"photo":"missing.jpg"}]}]"#,
        );
        let page = PageGenerator::default_config()
            .with_probe(Arc::new(Missing))
            .render(&PageModel::Ready {
                snapshot: &snap,
                overlay: None,
            })
            .unwrap();
        let messages: Vec<String> = page.asset_failures.iter().map(|f| f.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Failed to load image: /missing.png".to_string(),
                "Failed to load student photo: /missing.jpg".to_string(),
            ]
        );
        assert!(page.html.contains(r#"src="/ok.png""#));
        assert!(!page.html.contains(r#"src="/missing.png""#));
    }

    #[test]
    fn test_links_mode_open_overlay() {
        let snap = snapshot(r#"[{"id":"7","images":["a.png"]}]"#);
        let generator =
            PageGenerator::new(RenderConfig::default().with_interaction(InteractionMode::Links));
        let page = generator
            .render(&PageModel::Ready {
                snapshot: &snap,
                overlay: Some("/a.png"),
            })
            .unwrap();
        assert!(page.html.contains(r#"id="bv-overlay-image""#));
        assert!(page.html.contains(r#"href="?""#));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RenderConfig::default();
        config.cdn_base_url = "file:///tmp".to_string();
        let result = PageGenerator::new(config).render(&PageModel::Loading);
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_minified_output_is_smaller() {
        let snap = snapshot(r#"[{"id":"7","title":"Crash"}]"#);
        let model = PageModel::Ready {
            snapshot: &snap,
            overlay: None,
        };
        let plain = PageGenerator::default_config().render(&model).unwrap();
        let minified = PageGenerator::new(RenderConfig::default().with_minify(true))
            .render(&model)
            .unwrap();
        assert!(minified.html.len() < plain.html.len());
        assert!(minified.html.contains("Crash"));
    }

    #[test]
    fn test_write_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bug.html");
        PageGenerator::default_config()
            .write_page(&PageModel::Loading, &path)
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Loading..."));
    }
}
