//! Page configuration types.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Page color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTheme {
    /// Dark gray background with cyan accents.
    #[default]
    Dark,
    /// Light theme.
    Light,
    /// Follow the system preference.
    Auto,
}

impl PageTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            PageTheme::Dark => "dark",
            PageTheme::Light => "light",
            PageTheme::Auto => "",
        }
    }
}

/// How the lightbox and gallery interact with the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Thumbnails open the overlay through an inline script.
    #[default]
    Script,
    /// Thumbnails link to `?image=<path>`; the overlay is rendered by the server.
    Links,
}

/// CDN library configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnLibrary {
    /// npm package name.
    pub package: String,
    /// Pinned version number.
    pub version: String,
    /// Path within npm package.
    #[serde(default)]
    pub path: Option<String>,
}

impl CdnLibrary {
    /// Create a new CDN library configuration.
    pub fn new(package: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            path: None,
        }
    }

    /// Set the path within the npm package.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get the full CDN URL for this library.
    pub fn url(&self, base_url: &str) -> String {
        let path = self.path.as_deref().unwrap_or("dist/index.min.css");
        format!("{}/{}@{}/{}", base_url, self.package, self.version, path)
    }
}

fn default_cdn_base() -> String {
    "https://cdn.jsdelivr.net/npm".to_string()
}

fn default_stylesheet() -> Option<CdnLibrary> {
    Some(CdnLibrary::new("tailwindcss", "2.2.19").with_path("dist/tailwind.min.css"))
}

fn default_title_suffix() -> String {
    "Bug Details".to_string()
}

/// Complete page configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Color theme.
    #[serde(default)]
    pub theme: PageTheme,
    /// Lightbox interaction style.
    #[serde(default)]
    pub interaction: InteractionMode,
    /// Base URL for CDN resources.
    #[serde(default = "default_cdn_base")]
    pub cdn_base_url: String,
    /// Utility stylesheet; `None` renders with the inline styles only.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: Option<CdnLibrary>,
    /// Text appended to the document title.
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
    /// Minify the generated HTML.
    #[serde(default)]
    pub minify: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: PageTheme::default(),
            interaction: InteractionMode::default(),
            cdn_base_url: default_cdn_base(),
            stylesheet: default_stylesheet(),
            title_suffix: default_title_suffix(),
            minify: false,
        }
    }
}

impl RenderConfig {
    /// Create a new page configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: PageTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the interaction mode.
    pub fn with_interaction(mut self, interaction: InteractionMode) -> Self {
        self.interaction = interaction;
        self
    }

    /// Drop the CDN stylesheet (fully offline pages).
    pub fn without_stylesheet(mut self) -> Self {
        self.stylesheet = None;
        self
    }

    /// Enable HTML minification.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Check values that would otherwise produce a broken page.
    pub fn validate(&self) -> Result<()> {
        if let Some(lib) = &self.stylesheet {
            if !(self.cdn_base_url.starts_with("https://")
                || self.cdn_base_url.starts_with("http://"))
            {
                return Err(RenderError::InvalidConfig(format!(
                    "cdn_base_url must be an http(s) URL, got '{}'",
                    self.cdn_base_url
                )));
            }
            if lib.package.is_empty() || lib.version.is_empty() {
                return Err(RenderError::InvalidConfig(
                    "stylesheet package and version must be set".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
