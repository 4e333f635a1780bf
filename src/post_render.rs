use std::io;
use std::io::ErrorKind;

use markdown::Options;

/// Markdown body to HTML (GFM) for the detail view.
pub fn render_markdown(md_text: &str) -> io::Result<String> {
    match markdown::to_html_with_options(md_text, &Options::gfm()) {
        Ok(html) => Ok(html),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("# Title\n\nSome *emphasis* here.").unwrap();
        assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>emphasis</em> here.</p>");
    }

    #[test]
    fn test_render_markdown_gfm_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        assert!(html.contains("<table>"));
    }
}
