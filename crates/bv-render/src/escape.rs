//! HTML escaping helpers.

/// Escape HTML special characters for text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Query-string link that opens the overlay on `path`.
pub fn overlay_href(path: &str) -> String {
    format!("?image={}", urlencoding::encode(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(html_escape("it's"), "it&#x27;s");
    }

    #[test]
    fn test_overlay_href_encodes_path() {
        assert_eq!(overlay_href("/img/a b.png"), "?image=%2Fimg%2Fa%20b.png");
    }
}
