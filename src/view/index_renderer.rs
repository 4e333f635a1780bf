use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

#[derive(ramhorns::Content)]
struct IndexPage<'a> {
    site_title: &'a str,
    tagline: &'a str,
    post_count: usize,
}

pub struct IndexRenderer<'a> {
    pub template: Template<'a>,
}

impl IndexRenderer<'_> {
    pub fn new(index_tpl_src: &str) -> io::Result<IndexRenderer> {
        let template = match Template::new(index_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing index template: {}", e)));
            }
        };

        Ok(IndexRenderer { template })
    }

    pub fn render(&self, site_title: &str, tagline: &str, post_count: usize) -> String {
        self.template.render(&IndexPage {
            site_title,
            tagline,
            post_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_index() {
        let template_src = "{{site_title}} - {{tagline}} ({{post_count}} posts)";
        let renderer = IndexRenderer::new(template_src).unwrap();
        let res = renderer.render("Tims corner", "A place for my random ramblings", 14);
        assert_eq!(res, "Tims corner - A place for my random ramblings (14 posts)");
    }
}
