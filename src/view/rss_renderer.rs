use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::post::PostSummary;

/* Example
<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">

<channel>
  <title>Tims corner</title>
  <link>https://example.net</link>
  <description>A place for my random ramblings</description>
  <item>
    <title>What I learned shipping a side project</title>
    <link>https://example.net/blog/side-project/</link>
    <description>Four weekends, one deploy button</description>
  </item>
</channel>

</rss>
*/

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn render(&self, posts: &[PostSummary]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        for post in posts {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", post.title.as_str())?;

            // External posts point the reader off-site, same as the listing
            let link = match post.external_url {
                Some(ref url) => url.clone(),
                None => full_link(self.ch_link, post.slug.as_str()),
            };
            push_text(&mut writer, "link", link.as_str())?;

            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "false"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(post.slug.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_cdata(&mut writer, "description", post.description.as_str())?;

            // Midnight is always a valid time of day
            let midnight = post.date.and_hms_opt(0, 0, 0).unwrap();
            let dt = Utc.from_utc_datetime(&midnight);
            push_text(&mut writer, "pubDate", &dt.to_rfc2822())?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn full_link(base_url: &str, slug: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{}/blog/{}/", base_url, slug)
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str;

    use chrono::NaiveDate;

    use super::*;

    fn create_post(slug: &str) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: format!("title-of-{}", slug),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: format!("summary-of-{}", slug),
            tags: vec![],
            external_url: None,
            score: None,
        }
    }

    #[test]
    fn render_xml() {
        let mut posts = vec![create_post("post-1"), create_post("post-2")];
        posts[1].external_url = Some("https://elsewhere.example/talk".to_string());

        let rss = RssChannel {
            ch_title: "my feed",
            ch_link: "https://example.net",
            ch_desc: "My blog feed",
        };
        let xml = rss.render(&posts).unwrap();
        println!("XML: {}", str::from_utf8(&xml).unwrap());
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>my feed</title><link>https://example.net</link><description>My blog feed</description><item><title>title-of-post-1</title><link>https://example.net/blog/post-1/</link><guid isPermaLink="false">post-1</guid><description><![CDATA[summary-of-post-1]]></description><pubDate>Tue, 2 Jan 2024 00:00:00 +0000</pubDate></item><item><title>title-of-post-2</title><link>https://elsewhere.example/talk</link><guid isPermaLink="false">post-2</guid><description><![CDATA[summary-of-post-2]]></description><pubDate>Tue, 2 Jan 2024 00:00:00 +0000</pubDate></item></channel></rss>"##;
}
