use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, trace};
use url::Url;

/// File extensions that never point at a crawlable page.
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", // documents
    "zip", "rar", "7z", "tar", "gz", // archives
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", // images
    "mp3", "mp4", "avi", "mov", "wmv", "flv", // audio / video
    "css", "js", // assets
    "xml", "json", // structured data
];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Turns a fetched page into the set of pages it links to.
pub trait LinkExtractor: Send + Sync + 'static {
    /// Returns normalized absolute URLs found in `html`, resolved against `page_url`.
    ///
    /// Malformed markup and malformed individual links are not errors; they
    /// shrink the returned set. An `Err` means the page itself could not be
    /// used as a base for resolution.
    fn extract(&self, html: &str, page_url: &str) -> Result<BTreeSet<String>>;
}

/// Keeps links that stay on the configured origin and look like pages.
#[derive(Debug, Clone)]
pub struct SameOriginExtractor {
    origin: String,
}

impl SameOriginExtractor {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            origin: config.origin().to_string(),
        }
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.origin().ascii_serialization() == self.origin
    }
}

impl LinkExtractor for SameOriginExtractor {
    fn extract(&self, html: &str, page_url: &str) -> Result<BTreeSet<String>> {
        let base = Url::parse(page_url)
            .map_err(|e| ScanError::ParseError(format!("page URL '{}': {}", page_url, e)))?;

        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            // html5ever recovers from every error; the tree is still usable
            trace!("{} markup errors while parsing {}", document.errors.len(), page_url);
        }

        let mut found = BTreeSet::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href").map(str::trim) else {
                continue;
            };
            if !is_followable_href(href) {
                continue;
            }

            let Some(url) = normalize_link(&base, href) else {
                debug!("Skipping link '{}' on {}", href, page_url);
                continue;
            };

            if self.is_same_origin(&url) && is_page_like(&url) {
                found.insert(url.into());
            }
        }

        debug!("Extracted {} URLs from {}", found.len(), page_url);
        Ok(found)
    }
}

fn is_followable_href(href: &str) -> bool {
    !(href.is_empty()
        || href.starts_with('#')
        || href
            .get(..11)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:")))
}

/// Resolves `href` against `base` and canonicalizes the result.
pub fn normalize_link(base: &Url, href: &str) -> Option<Url> {
    canonicalize(base.join(href).ok()?)
}

/// Puts an absolute URL in the form used for deduplication.
///
/// Host lower-casing and default-port removal happen while parsing; this drops
/// the fragment and one trailing slash from any path other than `/`. Returns
/// `None` for schemes other than http and https.
pub fn canonicalize(mut url: Url) -> Option<Url> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    Some(url)
}

/// Whether a canonical URL names a distinct page rather than an asset or document.
pub fn is_page_like(url: &Url) -> bool {
    let path = url.path();
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((_, extension)) => !SKIPPED_EXTENSIONS
            .iter()
            .any(|skipped| skipped.eq_ignore_ascii_case(extension)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKE_CONTENT: &str = r##"
        <html>
        <body>
            <a href="/a">Relative A</a>
            <a href="b?q=1">Relative B with query</a>
            <a href="https://example.com/c">Absolute same domain</a>

            <!-- Should be skipped -->
            <a href="#section">Anchor</a>
            <a href="javascript:void(0)">JS link</a>
            <a href="https://sub.example.com/d">Subdomain</a>
            <a href="https://other.com/e">Other domain</a>
            <a href="/image.png">Image asset</a>
        </body>
        </html>
    "##;

    fn extractor() -> SameOriginExtractor {
        let config = CrawlConfig::builder("https://example.com").build().unwrap();
        SameOriginExtractor::new(&config)
    }

    fn normalize(raw: &str) -> String {
        canonicalize(Url::parse(raw).unwrap()).unwrap().to_string()
    }

    #[test]
    fn test_extract_urls() {
        let urls = extractor().extract(FAKE_CONTENT, "https://example.com").unwrap();

        let expected: BTreeSet<String> = [
            "https://example.com/a",
            "https://example.com/b?q=1",
            "https://example.com/c",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(urls, expected);
    }

    #[test]
    fn test_relative_links_resolve_against_page() {
        let html = r#"<a href="next">Next</a><a href="../up/">Up</a>"#;
        let urls = extractor()
            .extract(html, "https://example.com/docs/guide/intro")
            .unwrap();

        assert!(urls.contains("https://example.com/docs/guide/next"));
        assert!(urls.contains("https://example.com/docs/up"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"
            <a href="/a">one</a>
            <a href="/a/">two</a>
            <a href="https://EXAMPLE.com:443/a#top">three</a>
        "#;
        let urls = extractor().extract(html, "https://example.com/").unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://example.com/a"));
    }

    #[test]
    fn test_skips_javascript_case_insensitive_and_blank() {
        let html = r#"
            <a href="JavaScript:alert(1)">js</a>
            <a href="   ">blank</a>
            <a href="">empty</a>
            <a>no href</a>
            <a href="mailto:someone@example.com">mail</a>
        "#;
        let urls = extractor().extract(html, "https://example.com/").unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_root_link_is_kept() {
        let html = r#"<a href="/">Home</a><a href="https://example.com">Home again</a>"#;
        let urls = extractor().extract(html, "https://example.com/about").unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://example.com/"));
    }

    #[test]
    fn test_other_scheme_is_out_of_scope() {
        let html = r#"<a href="http://example.com/plain">plain</a>"#;
        let urls = extractor().extract(html, "https://example.com/").unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_custom_port_must_match() {
        let config = CrawlConfig::builder("http://127.0.0.1:8080/").build().unwrap();
        let extractor = SameOriginExtractor::new(&config);
        let html = r#"<a href="/same">same</a><a href="http://127.0.0.1:9090/other">other</a>"#;

        let urls = extractor.extract(html, "http://127.0.0.1:8080/").unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("http://127.0.0.1:8080/same"));
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let html = r#"<div><a href="/ok">ok<p></div></span><a href="/also">also"#;
        let urls = extractor().extract(html, "https://example.com/").unwrap();
        assert!(urls.contains("https://example.com/ok"));
    }

    #[test]
    fn test_invalid_page_url_is_an_error() {
        let result = extractor().extract(FAKE_CONTENT, "not a url");
        assert!(matches!(result, Err(ScanError::ParseError(_))));
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(normalize("https://example.com"), "https://example.com/");
        assert_eq!(normalize("https://example.com/"), "https://example.com/");
        assert_eq!(normalize("https://example.com/docs/"), "https://example.com/docs");
        assert_eq!(normalize("https://example.com/docs"), "https://example.com/docs");
    }

    #[test]
    fn test_default_port_and_host_case() {
        assert_eq!(normalize("https://example.com:443/x"), "https://example.com/x");
        assert_eq!(normalize("http://example.com:80/x"), "http://example.com/x");
        assert_eq!(normalize("http://Example.COM:8080/x"), "http://example.com:8080/x");
    }

    #[test]
    fn test_fragment_dropped_query_kept() {
        assert_eq!(normalize("https://example.com/page#frag"), "https://example.com/page");
        assert_eq!(
            normalize("https://example.com/page/?b=2&a=1#frag"),
            "https://example.com/page?b=2&a=1"
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in [
            "https://example.com",
            "https://example.com:443/docs/",
            "https://EXAMPLE.com/a?q=1#x",
            "http://example.com:8080/b/c/",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_canonicalize_rejects_non_http() {
        assert!(canonicalize(Url::parse("ftp://example.com/file").unwrap()).is_none());
        assert!(canonicalize(Url::parse("mailto:a@example.com").unwrap()).is_none());
    }

    #[test]
    fn test_is_page_like() {
        let page = |s: &str| is_page_like(&Url::parse(s).unwrap());

        assert!(page("https://example.com/"));
        assert!(page("https://example.com/about"));
        assert!(page("https://example.com/blog/post.html"));
        assert!(page("https://example.com/v1.2/notes"));
        assert!(!page("https://example.com/image.png"));
        assert!(!page("https://example.com/doc.pdf"));
        assert!(!page("https://example.com/Report.PDF"));
        assert!(!page("https://example.com/static/app.js"));
        assert!(!page("https://example.com/feed.xml?page=2"));
    }
}
