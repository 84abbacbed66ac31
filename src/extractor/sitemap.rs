use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use url::Url;

pub const SITE_MAP_PATH: &str = "sitemap.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapFormat {
    Xml,
    PlainText,
}

impl SitemapFormat {
    pub fn detect(text: &str) -> Self {
        match text.contains("<loc>") {
            true => SitemapFormat::Xml,
            false => SitemapFormat::PlainText,
        }
    }

    fn extract_urls(&self, text: &str) -> Vec<String> {
        match self {
            SitemapFormat::Xml => Self::extract_from_xml(text),
            SitemapFormat::PlainText => Self::extract_from_plain_text(text),
        }
    }

    fn extract_from_xml(text: &str) -> Vec<String> {
        let mut reader = quick_xml::Reader::from_str(text);
        let mut urls = Vec::new();
        let mut buf = Vec::new();
        let mut in_loc_tag = false;
        let mut loc = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"loc" => {
                    in_loc_tag = true;
                    loc.clear();
                }
                Ok(Event::End(ref e)) if e.name().as_ref() == b"loc" => {
                    in_loc_tag = false;
                    let txt = loc.trim();
                    if !txt.is_empty() {
                        urls.push(txt.to_string());
                    }
                }
                // `&amp;` and friends arrive as separate events
                Ok(Event::GeneralRef(e)) if in_loc_tag => {
                    if let Ok(name) = e.decode() {
                        if let Some(resolved) = resolve_predefined_entity(&name) {
                            loc.push_str(resolved);
                        }
                    }
                }
                Ok(Event::Text(e)) if in_loc_tag => match e.decode() {
                    Ok(txt) => loc.push_str(&txt),
                    Err(e) => {
                        tracing::warn!(
                            "[SITEMAP] Invalid <loc> text at {}: {}",
                            reader.buffer_position(),
                            e
                        );
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    tracing::warn!(
                        "[SITEMAP] Malformed XML at {}, keeping {} URLs: {}",
                        reader.buffer_position(),
                        urls.len(),
                        e
                    );
                    break;
                }
                _ => {}
            }
            buf.clear();
        }
        urls
    }

    fn extract_from_plain_text(text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|token| Url::parse(token).ok())
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .map(|url| url.to_string())
            .collect()
    }
}

/// Pull page URLs out of a sitemap body, XML `<loc>` entries or one URL per token.
pub fn extract_url_from_sitemap(text: &str) -> Vec<String> {
    let format = SitemapFormat::detect(text);
    tracing::trace!("[SITEMAP] Detected format: {:?}", format);
    format.extract_urls(text)
}
