//! # Web Sources
//!
//! Fetches public ADGM pages and flattens them to text for the index.
//! A page's text is the text of every `p`, `h1`-`h4`, `li`, `a`, `span`
//! and `div` element, in document order, joined with a single space.
//! Nested matches contribute their text once per matching ancestor, the
//! same way a flat tag search over the page does.
//!
//! Pages that fail to load are logged and skipped.

use std::time::Duration;

use scraper::{Html, Selector};

use crate::error::RagError;
use crate::retry::RetryPolicy;
use crate::loader::SourceDocument;

/// Pages scraped by default when building the index.
pub const DEFAULT_WEB_SOURCES: [&str; 5] = [
    "https://www.adgm.com/registration-authority/registration-and-incorporation",
    "https://www.adgm.com/setting-up",
    "https://www.adgm.com/legal-framework/guidance-and-policy-statements",
    "https://www.adgm.com/operating-in-adgm/obligations-of-adgm-registered-entities/annual-filings/annual-accounts",
    "https://www.adgm.com/operating-in-adgm/post-registration-services/letters-and-permits",
];

const TEXT_ELEMENTS: &str = "p, h1, h2, h3, h4, li, a, span, div";

/// HTTP fetcher for web sources.
#[derive(Debug, Clone)]
pub struct Scraper {
    http: reqwest::Client,
}

impl Scraper {
    pub fn new(timeout: Duration) -> Result<Self, RagError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("adgm-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RagError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http })
    }

    /// Fetch one page. `Ok(None)` when the page answered non-200 or had no
    /// text.
    pub async fn fetch(&self, url: &str) -> Result<Option<SourceDocument>, RagError> {
        let endpoint = format!("GET {url}");
        let resp = RetryPolicy::default().send(|| self.http.get(url).send())
            .await
            .map_err(|e| RagError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() != reqwest::StatusCode::OK {
            tracing::warn!(url, status = resp.status().as_u16(), "web source not available");
            return Ok(None);
        }

        let html = resp.text().await.map_err(|e| RagError::Deserialization {
            endpoint,
            source: e,
        })?;
        let text = html_text(&html)?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(SourceDocument {
            source: url.to_string(),
            text,
        }))
    }

    /// Fetch every URL in order, skipping failures.
    pub async fn fetch_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<SourceDocument> {
        let mut documents = Vec::new();
        for url in urls {
            let url = url.as_ref();
            match self.fetch(url).await {
                Ok(Some(doc)) => {
                    tracing::info!(url, chars = doc.text.chars().count(), "scraped web source");
                    documents.push(doc);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(url, error = %e, "failed to scrape web source"),
            }
        }
        documents
    }
}

/// Flatten an HTML page to the text of its content elements.
pub fn html_text(html: &str) -> Result<String, RagError> {
    let selector = Selector::parse(TEXT_ELEMENTS)
        .map_err(|e| RagError::Config(format!("invalid selector: {e}")))?;
    let document = Html::parse_document(html);

    let parts: Vec<String> = document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .map(|text| text.trim().to_string())
        .collect();
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_content_elements_in_order() {
        let html = r#"<html><head><title>Ignored</title><script>var x = 1;</script></head>
            <body><h1>Setting up</h1><p>Register with the <a href="/ra">Registration Authority</a>.</p>
            <ul><li>Articles</li><li>  </li></ul></body></html>"#;

        let text = html_text(html).unwrap();
        assert_eq!(
            text,
            "Setting up Register with the Registration Authority. Registration Authority Articles"
        );
    }

    #[test]
    fn page_without_content_elements_is_empty() {
        assert_eq!(html_text("<html><body><table><tr><td>x</td></tr></table></body></html>").unwrap(), "");
    }
}
