//! Enlarged-image overlay sub-state.

use bv_common::paths::is_placeholder;

/// Whether an image is shown enlarged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Open(String),
}

impl Overlay {
    /// Show `path` enlarged, replacing any open image.
    ///
    /// Empty paths and the placeholder are ignored; returns whether the
    /// overlay now shows `path`.
    pub fn open(&mut self, path: &str) -> bool {
        if path.is_empty() || is_placeholder(path) {
            return false;
        }
        *self = Overlay::Open(path.to_string());
        true
    }

    /// Close the overlay; returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Overlay::Closed;
        was_open
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Overlay::Open(_))
    }

    /// Path of the enlarged image, if open.
    pub fn image(&self) -> Option<&str> {
        match self {
            Overlay::Open(path) => Some(path),
            Overlay::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_common::PLACEHOLDER_PATH;

    #[test]
    fn test_open_and_close() {
        let mut overlay = Overlay::default();
        assert_eq!(overlay, Overlay::Closed);
        assert!(overlay.open("/a.png"));
        assert_eq!(overlay.image(), Some("/a.png"));
        assert!(overlay.open("/b.png"));
        assert_eq!(overlay.image(), Some("/b.png"));
        assert!(overlay.close());
        assert!(!overlay.close());
    }

    #[test]
    fn test_placeholder_and_empty_ignored() {
        let mut overlay = Overlay::default();
        assert!(!overlay.open(PLACEHOLDER_PATH));
        assert!(!overlay.open(""));
        assert_eq!(overlay, Overlay::Closed);

        overlay.open("/a.png");
        assert!(!overlay.open(PLACEHOLDER_PATH));
        assert_eq!(overlay.image(), Some("/a.png"));
    }
}
